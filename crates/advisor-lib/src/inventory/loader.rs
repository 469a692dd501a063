//! Inventory document loading

use crate::error::{AnalysisError, Result};
use crate::models::ApplicationInventory;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field that exports sometimes write as a JSON string and
/// sometimes as a JSON number. Anything else becomes empty text, which the
/// normalizer later treats as zero.
pub fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Deserialize a field whose explicit JSON `null` means the same as an
/// absent key
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a list that may itself be `null` or contain `null` entries.
/// Null entries are dropped.
pub fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.into_iter().flatten().flatten().collect())
}

/// Parse an inventory document
///
/// A `null` document means no inventory was supplied and is rejected as
/// invalid input.
pub fn load_inventory_json(content: &str) -> Result<ApplicationInventory> {
    let parsed: Option<ApplicationInventory> = serde_json::from_str(content)?;
    parsed.ok_or_else(|| AnalysisError::InvalidInput("inventory document is null".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_document() {
        let json = r#"{
            "application_ID": 1042,
            "application_Name": "Claims Portal",
            "application_Acronym": "CLP",
            "criticality": "Critical",
            "languages": "C#, SQL",
            "in_Use_Server_Associations": "2",
            "in_Use_Prod_Servers": "1",
            "in_Use_Non_Prod_Servers": "1",
            "application_Hosting_Model": "On-Premises",
            "mALServers": [
                { "server_Name": "clp-web01", "cpUs_Cores": "8", "memory_Size_MB": 32768, "city": "Denver" },
                { "server_Name": "clp-web02", "cpUs_Cores": null }
            ]
        }"#;

        let inventory = load_inventory_json(json).unwrap();
        assert_eq!(inventory.application_id, "1042");
        assert_eq!(inventory.application_name, "Claims Portal");
        assert_eq!(inventory.servers.len(), 2);
        assert_eq!(inventory.servers[0].memory_mb, "32768");
        assert_eq!(inventory.servers[1].cores, "");
    }

    #[test]
    fn test_null_document_is_invalid_input() {
        let err = load_inventory_json("null").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = load_inventory_json("{\"application_Name\": ").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let inventory = load_inventory_json("{}").unwrap();
        assert_eq!(inventory, ApplicationInventory::default());
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let json = r#"{
            "application_Name": "Claims Portal",
            "criticality": null,
            "languages": null,
            "mALServers": [
                { "server_Name": "a", "cpUs_Cores": "8", "city": null, "state": null }
            ]
        }"#;

        let inventory = load_inventory_json(json).unwrap();
        assert_eq!(inventory.criticality, "");
        assert_eq!(inventory.languages, "");
        assert_eq!(inventory.servers[0].city, "");
        assert_eq!(inventory.servers[0].cores, "8");
    }

    #[test]
    fn test_null_server_list_reads_as_empty() {
        let inventory =
            load_inventory_json(r#"{ "application_Name": "x", "mALServers": null }"#).unwrap();
        assert!(inventory.servers.is_empty());

        let inventory = load_inventory_json(
            r#"{ "mALServers": [null, { "server_Name": "a", "cpUs_Cores": "2" }] }"#,
        )
        .unwrap();
        assert_eq!(inventory.servers.len(), 1);
        assert_eq!(inventory.servers[0].name, "a");
    }

    #[test]
    fn test_null_city_falls_back_to_default_region() {
        let inventory = load_inventory_json(
            r#"{ "criticality": "Critical", "mALServers": [{ "server_Name": "a", "cpUs_Cores": "8", "city": null }] }"#,
        )
        .unwrap();

        let rec = crate::engine::Analyzer::default().analyze(&inventory);
        assert_eq!(rec.target_state.region, "East US");
        assert_eq!(rec.current_state.aggregates.total_cores, 8);
    }
}
