//! Target region resolution
//!
//! Only the first server's city is consulted; multi-region inventories
//! resolve to wherever their first server lives.

use crate::models::ServerRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized shape of a [`RegionMap`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMapSpec {
    #[serde(default)]
    pub cities: BTreeMap<String, String>,
    pub default_region: String,
}

/// City → region lookup with a fallback region
///
/// City keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegionMapSpec", into = "RegionMapSpec")]
pub struct RegionMap {
    cities: BTreeMap<String, String>,
    default_region: String,
}

impl RegionMap {
    pub fn new<I, K, V>(cities: I, default_region: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            cities: cities
                .into_iter()
                .map(|(city, region)| (city.as_ref().to_lowercase(), region.into()))
                .collect(),
            default_region: default_region.into(),
        }
    }

    /// Region for a city, or the default when unknown or missing
    pub fn resolve_city(&self, city: Option<&str>) -> &str {
        city.and_then(|c| self.cities.get(&c.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(&self.default_region)
    }

    /// Region for an inventory, from its first server's city
    pub fn resolve(&self, servers: &[ServerRecord]) -> &str {
        self.resolve_city(servers.first().map(|s| s.city.as_str()))
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::new(
            [("denver", "West US 2"), ("broomfield", "West US 2")],
            "East US",
        )
    }
}

impl From<RegionMapSpec> for RegionMap {
    fn from(spec: RegionMapSpec) -> Self {
        Self::new(spec.cities, spec.default_region)
    }
}

impl From<RegionMap> for RegionMapSpec {
    fn from(map: RegionMap) -> Self {
        Self {
            cities: map.cities,
            default_region: map.default_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_in(city: &str) -> ServerRecord {
        ServerRecord {
            city: city.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_known_cities_any_case() {
        let regions = RegionMap::default();
        assert_eq!(regions.resolve_city(Some("Denver")), "West US 2");
        assert_eq!(regions.resolve_city(Some("DENVER")), "West US 2");
        assert_eq!(regions.resolve_city(Some("broomfield")), "West US 2");
    }

    #[test]
    fn test_unknown_or_missing_city_falls_back() {
        let regions = RegionMap::default();
        assert_eq!(regions.resolve_city(Some("Omaha")), "East US");
        assert_eq!(regions.resolve_city(Some("")), "East US");
        assert_eq!(regions.resolve_city(None), "East US");
        assert_eq!(regions.resolve(&[]), "East US");
    }

    #[test]
    fn test_only_first_server_counts() {
        let regions = RegionMap::default();
        let servers = vec![server_in("Omaha"), server_in("Denver")];
        assert_eq!(regions.resolve(&servers), "East US");

        let servers = vec![server_in("denver"), server_in("Omaha")];
        assert_eq!(regions.resolve(&servers), "West US 2");
    }

    #[test]
    fn test_configured_keys_are_case_folded() {
        let json = r#"{ "cities": { "Chicago": "North Central US" }, "default_region": "Central US" }"#;
        let regions: RegionMap = serde_json::from_str(json).unwrap();
        assert_eq!(regions.resolve_city(Some("chicago")), "North Central US");
        assert_eq!(regions.resolve_city(Some("Denver")), "Central US");
    }
}
