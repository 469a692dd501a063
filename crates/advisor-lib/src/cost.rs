//! Cost estimation
//!
//! Flat monthly costs come from the tier table; totals add fixed storage
//! and networking overhead. All amounts carry two decimal places.

use crate::models::{CostBreakdown, RecommendedService};
use crate::sizing::TierTable;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Months per year used for the annual figure
pub const MONTHS_PER_YEAR: u32 = 12;

/// Round an amount to cents, always carrying two decimal places
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Fixed cost figures that do not depend on the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub monthly_storage: Decimal,
    pub monthly_networking: Decimal,
    /// One-time migration cost; a constant, not derived from inventory size
    pub migration: Decimal,
    pub optimization_tips: String,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            monthly_storage: Decimal::new(5000, 2),
            monthly_networking: Decimal::new(2500, 2),
            migration: Decimal::new(1500000, 2),
            optimization_tips: "Use Azure Hybrid Benefit for Windows licenses, implement \
                auto-scaling, consider Reserved Instances for predictable workloads"
                .to_string(),
        }
    }
}

/// Composes per-service costs and fixed overhead into a cost breakdown
pub struct CostEstimator<'a> {
    tiers: &'a TierTable,
    config: &'a CostConfig,
}

impl<'a> CostEstimator<'a> {
    pub fn new(tiers: &'a TierTable, config: &'a CostConfig) -> Self {
        Self { tiers, config }
    }

    /// Flat monthly compute cost for a (cores, memory GB) footprint
    pub fn compute_cost(&self, cores: u64, memory_gb: u64) -> Decimal {
        round_money(self.tiers.classify(cores, memory_gb).monthly_cost)
    }

    /// Storage plus networking overhead added to every estimate
    pub fn fixed_overhead(&self) -> Decimal {
        round_money(self.config.monthly_storage) + round_money(self.config.monthly_networking)
    }

    /// Break down monthly, annual and one-time costs for the attached services
    ///
    /// The total is order-independent and includes the fixed overhead even
    /// when no service is attached.
    pub fn breakdown(&self, services: &[RecommendedService]) -> CostBreakdown {
        let monthly_compute = round_money(
            services
                .iter()
                .map(|s| round_money(s.estimated_monthly_cost))
                .sum(),
        );
        let total_monthly = monthly_compute + self.fixed_overhead();

        CostBreakdown {
            monthly_compute,
            monthly_storage: round_money(self.config.monthly_storage),
            monthly_networking: round_money(self.config.monthly_networking),
            total_monthly,
            annual: total_monthly * Decimal::from(MONTHS_PER_YEAR),
            migration: round_money(self.config.migration),
            optimization_tips: self.config.optimization_tips.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(cost: Decimal) -> RecommendedService {
        RecommendedService {
            service_type: "Virtual Machine".to_string(),
            service_name: "vm".to_string(),
            sku: "sku".to_string(),
            size: "size".to_string(),
            recommended_cores: 0,
            recommended_memory_gb: 0,
            recommended_storage_gb: 0,
            tier: "Standard".to_string(),
            justification: String::new(),
            estimated_monthly_cost: cost,
        }
    }

    #[test]
    fn test_compute_cost_bands() {
        let tiers = TierTable::default();
        let config = CostConfig::default();
        let estimator = CostEstimator::new(&tiers, &config);

        assert_eq!(estimator.compute_cost(8, 32), Decimal::new(35000, 2));
        assert_eq!(estimator.compute_cost(8, 16), Decimal::new(17500, 2));
        assert_eq!(estimator.compute_cost(2, 8), Decimal::new(8750, 2));
        assert_eq!(estimator.compute_cost(1, 1), Decimal::new(4375, 2));
    }

    #[test]
    fn test_breakdown_adds_overhead() {
        let tiers = TierTable::default();
        let config = CostConfig::default();
        let estimator = CostEstimator::new(&tiers, &config);

        let costs = estimator.breakdown(&[
            service(Decimal::new(29200, 2)),
            service(Decimal::new(35000, 2)),
        ]);

        assert_eq!(costs.monthly_compute, Decimal::new(64200, 2));
        assert_eq!(costs.monthly_storage, Decimal::new(5000, 2));
        assert_eq!(costs.monthly_networking, Decimal::new(2500, 2));
        assert_eq!(costs.total_monthly, Decimal::new(71700, 2));
        assert_eq!(costs.annual, Decimal::new(860400, 2));
        assert_eq!(costs.migration, Decimal::new(1500000, 2));
        assert_eq!(costs.total_monthly.to_string(), "717.00");
    }

    #[test]
    fn test_empty_services_still_carry_overhead() {
        let tiers = TierTable::default();
        let config = CostConfig::default();
        let estimator = CostEstimator::new(&tiers, &config);

        let costs = estimator.breakdown(&[]);
        assert_eq!(costs.monthly_compute, Decimal::ZERO);
        assert_eq!(costs.monthly_compute.to_string(), "0.00");
        assert_eq!(costs.total_monthly, estimator.fixed_overhead());
        assert_eq!(costs.total_monthly, Decimal::new(7500, 2));
        assert_eq!(costs.annual, Decimal::new(90000, 2));
    }

    #[test]
    fn test_total_is_order_independent() {
        let tiers = TierTable::default();
        let config = CostConfig::default();
        let estimator = CostEstimator::new(&tiers, &config);

        let a = service(Decimal::new(4375, 2));
        let b = service(Decimal::new(8750, 2));
        let c = service(Decimal::new(29200, 2));

        let forward = estimator.breakdown(&[a.clone(), b.clone(), c.clone()]);
        let backward = estimator.breakdown(&[c, b, a]);
        assert_eq!(forward.total_monthly, backward.total_monthly);
        assert_eq!(forward.annual, backward.annual);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(Decimal::new(43755, 3)), Decimal::new(4376, 2));
        assert_eq!(round_money(Decimal::new(875, 1)).to_string(), "87.50");
    }
}
