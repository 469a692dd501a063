//! Compute tier table
//!
//! One row per tier carries the SKU, the human size label and the flat
//! monthly cost, so sizing and cost estimation read the same bands.

use crate::error::{AnalysisError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A compute-sizing band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeTier {
    /// Minimum total cores for this band (ignored for the default tier)
    #[serde(default)]
    pub min_cores: u64,
    /// Minimum total memory in GB for this band (ignored for the default tier)
    #[serde(default)]
    pub min_memory_gb: u64,
    pub sku: String,
    pub size_label: String,
    pub monthly_cost: Decimal,
}

impl ComputeTier {
    pub fn new(
        min_cores: u64,
        min_memory_gb: u64,
        sku: &str,
        size_label: &str,
        monthly_cost: Decimal,
    ) -> Self {
        Self {
            min_cores,
            min_memory_gb,
            sku: sku.to_string(),
            size_label: size_label.to_string(),
            monthly_cost,
        }
    }

    /// True when both thresholds of the band are met
    pub fn admits(&self, cores: u64, memory_gb: u64) -> bool {
        cores >= self.min_cores && memory_gb >= self.min_memory_gb
    }
}

/// Serialized shape of a [`TierTable`], validated on conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTableSpec {
    pub bands: Vec<ComputeTier>,
    pub default_tier: ComputeTier,
}

/// Ordered threshold bands evaluated top-down, plus a catch-all default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TierTableSpec", into = "TierTableSpec")]
pub struct TierTable {
    bands: Vec<ComputeTier>,
    default_tier: ComputeTier,
}

impl TierTable {
    /// Build a table, rejecting bands that could never be reached or that
    /// carry unusable rows
    ///
    /// Bands must be listed highest first: each band's thresholds are no
    /// larger than the previous band's and strictly smaller in at least one
    /// dimension.
    pub fn new(bands: Vec<ComputeTier>, default_tier: ComputeTier) -> Result<Self> {
        for tier in bands.iter().chain(std::iter::once(&default_tier)) {
            if tier.sku.trim().is_empty() {
                return Err(AnalysisError::InvalidConfig(
                    "tier SKU must not be empty".to_string(),
                ));
            }
            if tier.monthly_cost.is_sign_negative() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "tier {} has a negative monthly cost",
                    tier.sku
                )));
            }
        }

        for pair in bands.windows(2) {
            let (higher, lower) = (&pair[0], &pair[1]);
            let not_larger =
                lower.min_cores <= higher.min_cores && lower.min_memory_gb <= higher.min_memory_gb;
            let strictly_smaller =
                lower.min_cores < higher.min_cores || lower.min_memory_gb < higher.min_memory_gb;
            if !(not_larger && strictly_smaller) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "tier {} ({} cores, {} GB) must rank below {} ({} cores, {} GB)",
                    lower.sku,
                    lower.min_cores,
                    lower.min_memory_gb,
                    higher.sku,
                    higher.min_cores,
                    higher.min_memory_gb
                )));
            }
        }

        Ok(Self {
            bands,
            default_tier,
        })
    }

    /// First band whose thresholds are both met, otherwise the default tier
    pub fn classify(&self, cores: u64, memory_gb: u64) -> &ComputeTier {
        self.bands
            .iter()
            .find(|tier| tier.admits(cores, memory_gb))
            .unwrap_or(&self.default_tier)
    }

    pub fn bands(&self) -> &[ComputeTier] {
        &self.bands
    }

    pub fn default_tier(&self) -> &ComputeTier {
        &self.default_tier
    }

    /// All tiers in priority order, default last
    pub fn iter(&self) -> impl Iterator<Item = &ComputeTier> {
        self.bands.iter().chain(std::iter::once(&self.default_tier))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            bands: vec![
                ComputeTier::new(8, 32, "Standard_D8s_v5", "8 vCPUs, 32 GB RAM", Decimal::new(35000, 2)),
                ComputeTier::new(4, 16, "Standard_D4s_v5", "4 vCPUs, 16 GB RAM", Decimal::new(17500, 2)),
                ComputeTier::new(2, 8, "Standard_D2s_v5", "2 vCPUs, 8 GB RAM", Decimal::new(8750, 2)),
            ],
            default_tier: ComputeTier::new(0, 0, "Standard_B2s", "2 vCPUs, 4 GB RAM", Decimal::new(4375, 2)),
        }
    }
}

impl TryFrom<TierTableSpec> for TierTable {
    type Error = AnalysisError;

    fn try_from(spec: TierTableSpec) -> Result<Self> {
        Self::new(spec.bands, spec.default_tier)
    }
}

impl From<TierTable> for TierTableSpec {
    fn from(table: TierTable) -> Self {
        Self {
            bands: table.bands,
            default_tier: table.default_tier,
        }
    }
}
