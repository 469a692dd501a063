//! Sizing classification
//!
//! Maps aggregate core/memory totals to target cloud services: an optional
//! managed-platform offering when the technology stack allows it, and a
//! lift-and-shift virtual machine sized from the tier table.

mod tier;

pub use tier::{ComputeTier, TierTable, TierTableSpec};

use crate::cost::{round_money, CostEstimator};
use crate::models::{Aggregates, RecommendedService};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Managed application platform offered to stacks with a recognized runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagedPlatformOffering {
    pub service_type: String,
    pub service_name: String,
    pub sku: String,
    pub size: String,
    pub tier: String,
    pub storage_gb: u64,
    pub justification: String,
    pub monthly_cost: Decimal,
    /// Platform minimum cores per instance
    pub min_cores: u64,
    /// Platform minimum memory per instance, in GB
    pub min_memory_gb: u64,
    /// Case-sensitive substrings of the technology list that qualify a stack
    pub runtime_markers: Vec<String>,
}

impl Default for ManagedPlatformOffering {
    fn default() -> Self {
        Self {
            service_type: "App Service".to_string(),
            service_name: "Azure App Service".to_string(),
            sku: "P2V3".to_string(),
            size: "Premium P2V3".to_string(),
            tier: "Premium".to_string(),
            storage_gb: 250,
            justification: "Recommended for C# applications with moderate to high traffic. \
                Provides auto-scaling, deployment slots, and integrated monitoring."
                .to_string(),
            monthly_cost: Decimal::new(29200, 2),
            min_cores: 2,
            min_memory_gb: 8,
            runtime_markers: vec!["C#".to_string()],
        }
    }
}

impl ManagedPlatformOffering {
    /// True when the raw technology list names a supported runtime
    pub fn applies_to(&self, languages: &str) -> bool {
        self.runtime_markers
            .iter()
            .any(|marker| !marker.is_empty() && languages.contains(marker.as_str()))
    }

    /// Instance cores: half the on-prem footprint, never below the platform floor
    pub fn sized_cores(&self, total_cores: u64) -> u64 {
        (total_cores / 2).max(self.min_cores)
    }

    /// Instance memory: the on-prem footprint, never below the platform floor
    pub fn sized_memory_gb(&self, memory_gb: u64) -> u64 {
        memory_gb.max(self.min_memory_gb)
    }
}

/// Lift-and-shift virtual machine labels; sizing and cost come from the tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualMachineOffering {
    pub service_type: String,
    pub service_name: String,
    pub tier: String,
    pub justification: String,
}

impl Default for VirtualMachineOffering {
    fn default() -> Self {
        Self {
            service_type: "Virtual Machine".to_string(),
            service_name: "Azure Virtual Machine".to_string(),
            tier: "Standard".to_string(),
            justification:
                "Lift-and-shift option maintaining current architecture with minimal changes."
                    .to_string(),
        }
    }
}

/// Chooses target services for a workload
pub struct SizingClassifier<'a> {
    tiers: &'a TierTable,
    pricing: &'a CostEstimator<'a>,
    virtual_machine: &'a VirtualMachineOffering,
    managed_platform: &'a ManagedPlatformOffering,
}

impl<'a> SizingClassifier<'a> {
    pub fn new(
        tiers: &'a TierTable,
        pricing: &'a CostEstimator<'a>,
        virtual_machine: &'a VirtualMachineOffering,
        managed_platform: &'a ManagedPlatformOffering,
    ) -> Self {
        Self {
            tiers,
            pricing,
            virtual_machine,
            managed_platform,
        }
    }

    /// Tier for the given totals
    pub fn classify(&self, aggregates: &Aggregates) -> &'a ComputeTier {
        self.tiers
            .classify(aggregates.total_cores, aggregates.memory_gb())
    }

    /// Services to attach, in display order: managed platform first (when
    /// the stack qualifies), then the lift-and-shift VM
    pub fn recommend(&self, aggregates: &Aggregates, languages: &str) -> Vec<RecommendedService> {
        let mut services = Vec::with_capacity(2);

        if self.managed_platform.applies_to(languages) {
            services.push(self.managed_platform_service(aggregates));
        }
        services.push(self.virtual_machine_service(aggregates));

        debug!(
            services = services.len(),
            total_cores = aggregates.total_cores,
            memory_gb = aggregates.memory_gb(),
            "Sizing complete"
        );
        services
    }

    fn managed_platform_service(&self, aggregates: &Aggregates) -> RecommendedService {
        let offering = self.managed_platform;
        RecommendedService {
            service_type: offering.service_type.clone(),
            service_name: offering.service_name.clone(),
            sku: offering.sku.clone(),
            size: offering.size.clone(),
            recommended_cores: offering.sized_cores(aggregates.total_cores),
            recommended_memory_gb: offering.sized_memory_gb(aggregates.memory_gb()),
            recommended_storage_gb: offering.storage_gb,
            tier: offering.tier.clone(),
            justification: offering.justification.clone(),
            estimated_monthly_cost: round_money(offering.monthly_cost),
        }
    }

    fn virtual_machine_service(&self, aggregates: &Aggregates) -> RecommendedService {
        let tier = self.classify(aggregates);
        RecommendedService {
            service_type: self.virtual_machine.service_type.clone(),
            service_name: self.virtual_machine.service_name.clone(),
            sku: tier.sku.clone(),
            size: tier.size_label.clone(),
            recommended_cores: aggregates.total_cores,
            recommended_memory_gb: aggregates.memory_gb(),
            recommended_storage_gb: aggregates.total_disk_gb,
            tier: self.virtual_machine.tier.clone(),
            justification: self.virtual_machine.justification.clone(),
            estimated_monthly_cost: self
                .pricing
                .compute_cost(aggregates.total_cores, aggregates.memory_gb()),
        }
    }
}
