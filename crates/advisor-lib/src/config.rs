//! Engine configuration
//!
//! Every lookup table the engine reads lives here, bound to an
//! [`crate::engine::Analyzer`] at construction. All sections default to the
//! built-in tables, so a partial document only overrides what it names.

use crate::assessment::AssessmentConfig;
use crate::cost::CostConfig;
use crate::error::{AnalysisError, Result};
use crate::region::RegionMap;
use crate::sizing::{ManagedPlatformOffering, TierTable, VirtualMachineOffering};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tiers: TierTable,
    pub virtual_machine: VirtualMachineOffering,
    pub managed_platform: ManagedPlatformOffering,
    pub costs: CostConfig,
    pub assessment: AssessmentConfig,
    pub regions: RegionMap,
}

impl EngineConfig {
    /// Parse and validate a JSON engine configuration
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON engine configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Check the figures the tier table does not already guard
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("managed_platform.monthly_cost", self.managed_platform.monthly_cost),
            ("costs.monthly_storage", self.costs.monthly_storage),
            ("costs.monthly_networking", self.costs.monthly_networking),
            ("costs.migration", self.costs.migration),
        ];
        for (name, amount) in amounts {
            if amount.is_sign_negative() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }

        if self.regions.default_region().trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "regions.default_region must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "costs": { "migration": "25000.00" }, "assessment": { "estimated_timeframe": "6-9 months" } }"#,
        )
        .unwrap();

        assert_eq!(config.costs.migration, Decimal::new(2500000, 2));
        assert_eq!(config.costs.monthly_storage, Decimal::new(5000, 2));
        assert_eq!(config.assessment.estimated_timeframe, "6-9 months");
        assert_eq!(config.assessment.non_critical_marker, "Non-Critical");
        assert_eq!(config.tiers, TierTable::default());
    }

    #[test]
    fn test_negative_overhead_rejected() {
        let err = EngineConfig::from_json(r#"{ "costs": { "monthly_storage": "-1" } }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_tier_table_rejected() {
        let json = r#"{ "tiers": { "bands": [], "default_tier": { "sku": "", "size_label": "x", "monthly_cost": "1" } } }"#;
        assert!(EngineConfig::from_json(json).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EngineConfig::from_json_file(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }
}
