//! Core data models for the migration advisor
//!
//! Input types mirror the on-premises inventory export (field names follow
//! the export's wire format). Output types make up the recommendation record
//! produced by [`crate::engine::Analyzer`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::{lenient_list, null_as_default, text_or_number};

/// One physical or virtual on-premises server as exported by the inventory
///
/// Numeric columns are kept as the raw text of the export; the normalizer
/// turns them into numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerRecord {
    #[serde(rename = "server_Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "environment_Association", deserialize_with = "null_as_default")]
    pub environment: String,
    #[serde(rename = "server_Status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "operating_System", deserialize_with = "null_as_default")]
    pub operating_system: String,
    #[serde(rename = "cpUs_Physical", deserialize_with = "text_or_number")]
    pub physical_cpus: String,
    #[serde(rename = "cpU_Description", deserialize_with = "null_as_default")]
    pub cpu_description: String,
    #[serde(rename = "cpUs_Cores", deserialize_with = "text_or_number")]
    pub cores: String,
    #[serde(rename = "cpUs_HW_threads", deserialize_with = "text_or_number")]
    pub hardware_threads: String,
    #[serde(rename = "cpU_Speed_MHz", deserialize_with = "text_or_number")]
    pub cpu_speed_mhz: String,
    #[serde(rename = "memory_Size_MB", deserialize_with = "text_or_number")]
    pub memory_mb: String,
    #[serde(rename = "disk_Size_GB", deserialize_with = "text_or_number")]
    pub disk_gb: String,
    #[serde(rename = "tcP_IP_Address", deserialize_with = "null_as_default")]
    pub ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "location_Code", deserialize_with = "null_as_default")]
    pub location_code: String,
}

/// One application under migration, with its declared server counts and
/// the servers backing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInventory {
    #[serde(rename = "application_ID", deserialize_with = "text_or_number")]
    pub application_id: String,
    #[serde(rename = "application_Name", deserialize_with = "null_as_default")]
    pub application_name: String,
    #[serde(rename = "application_Acronym", deserialize_with = "null_as_default")]
    pub application_acronym: String,
    #[serde(deserialize_with = "null_as_default")]
    pub assignment: String,
    #[serde(rename = "target_Disposition", deserialize_with = "null_as_default")]
    pub target_disposition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub criticality: String,
    #[serde(rename = "host_Platform", deserialize_with = "null_as_default")]
    pub host_platform: String,
    /// Comma-separated technology list, e.g. `"C#, SQL"`
    #[serde(deserialize_with = "null_as_default")]
    pub languages: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(rename = "in_Use_Server_Associations", deserialize_with = "text_or_number")]
    pub total_servers: String,
    #[serde(rename = "in_Use_Prod_Servers", deserialize_with = "text_or_number")]
    pub production_servers: String,
    #[serde(rename = "in_Use_Non_Prod_Servers", deserialize_with = "text_or_number")]
    pub non_production_servers: String,
    #[serde(rename = "application_Hosting_Model", deserialize_with = "null_as_default")]
    pub hosting_model: String,
    #[serde(rename = "mALServers", deserialize_with = "lenient_list")]
    pub servers: Vec<ServerRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "business_Impact", deserialize_with = "null_as_default")]
    pub business_impact: String,
}

/// Normalized view of a single server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub server_name: String,
    pub environment: String,
    pub cores: u64,
    pub memory_mb: u64,
    pub disk_gb: u64,
    pub operating_system: String,
    pub location: String,
}

/// Summed resource totals across every server of an inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_cores: u64,
    pub total_memory_mb: u64,
    pub total_disk_gb: u64,
}

impl Aggregates {
    /// Total memory in whole gigabytes (integer division)
    pub fn memory_gb(&self) -> u64 {
        self.total_memory_mb / 1024
    }
}

/// Server counts as declared by the inventory, not recounted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCounts {
    pub total: u64,
    pub production: u64,
    pub non_production: u64,
}

/// One target cloud offering attached to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedService {
    pub service_type: String,
    pub service_name: String,
    pub sku: String,
    pub size: String,
    pub recommended_cores: u64,
    pub recommended_memory_gb: u64,
    pub recommended_storage_gb: u64,
    pub tier: String,
    pub justification: String,
    pub estimated_monthly_cost: Decimal,
}

/// Overall migration complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityLevel {
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    pub overall: ComplexityLevel,
    pub factors: Vec<String>,
    pub estimated_timeframe: String,
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityRecommendations {
    pub identity_and_access: Vec<String>,
    pub network_security: Vec<String>,
    pub data_protection: Vec<String>,
}

/// Monthly, annual and one-time cost figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub monthly_compute: Decimal,
    pub monthly_storage: Decimal,
    pub monthly_networking: Decimal,
    pub total_monthly: Decimal,
    pub annual: Decimal,
    pub migration: Decimal,
    pub optimization_tips: String,
}

/// What the application looks like today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub total_servers: u64,
    pub production_servers: u64,
    pub non_production_servers: u64,
    pub servers: Vec<ServerSpec>,
    pub aggregates: Aggregates,
    pub hosting_model: String,
    pub technologies: Vec<String>,
    pub business_criticality: String,
}

/// What the application should look like after migration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    /// Attached in insertion order; order matters for display only
    pub services: Vec<RecommendedService>,
    pub region: String,
    pub security: SecurityRecommendations,
}

/// The engine's sole output. Built once per analysis, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecommendation {
    pub application_id: String,
    pub application_name: String,
    pub application_acronym: String,
    pub current_state: CurrentState,
    pub target_state: TargetState,
    pub key_recommendations: Vec<String>,
    pub complexity: ComplexityAssessment,
    pub costs: CostBreakdown,
    pub risks: Vec<String>,
}

impl MigrationRecommendation {
    /// Sum of the attached services' monthly costs
    pub fn services_monthly_cost(&self) -> Decimal {
        self.target_state
            .services
            .iter()
            .map(|s| s.estimated_monthly_cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_gb_uses_integer_division() {
        let aggregates = Aggregates {
            total_cores: 4,
            total_memory_mb: 40959,
            total_disk_gb: 0,
        };
        assert_eq!(aggregates.memory_gb(), 39);
    }

    #[test]
    fn test_complexity_level_display() {
        assert_eq!(ComplexityLevel::Medium.to_string(), "Medium");
        assert_eq!(ComplexityLevel::High.to_string(), "High");
    }

    #[test]
    fn test_server_record_wire_names() {
        let json = r#"{
            "server_Name": "app01",
            "environment_Association": "Production",
            "cpUs_Cores": 8,
            "memory_Size_MB": "32768",
            "city": "Denver"
        }"#;
        let server: ServerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(server.name, "app01");
        assert_eq!(server.environment, "Production");
        assert_eq!(server.cores, "8");
        assert_eq!(server.memory_mb, "32768");
        assert_eq!(server.disk_gb, "");
        assert_eq!(server.city, "Denver");
    }
}
