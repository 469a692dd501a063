//! Recommendation assembly
//!
//! [`Analyzer`] is the single entry point of the engine: a pure function
//! from an inventory to a recommendation, given the lookup tables it was
//! built with. It holds no mutable state and can be shared across threads.

use crate::assessment::{Assessor, TemplateSlots};
use crate::config::EngineConfig;
use crate::cost::{CostEstimator, MONTHS_PER_YEAR};
use crate::error::{AnalysisError, Result};
use crate::inventory::{normalize, FieldParseFailure};
use crate::models::{
    ApplicationInventory, CurrentState, MigrationRecommendation, ServerRecord, TargetState,
};
use rust_decimal::Decimal;
use crate::sizing::SizingClassifier;
use std::time::{Duration, Instant};
use tracing::debug;

/// A recommendation plus the diagnostics gathered while building it
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub recommendation: MigrationRecommendation,
    pub parse_failures: Vec<FieldParseFailure>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    /// Build an analyzer over validated lookup tables
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Re-validate the lookup tables and run a one-server reference
    /// workload through the whole pipeline, checking the cost arithmetic
    pub fn self_check(&self) -> Result<()> {
        self.config.validate()?;

        let reference = ApplicationInventory {
            application_name: "self-check".to_string(),
            servers: vec![ServerRecord {
                name: "self-check".to_string(),
                cores: "4".to_string(),
                memory_mb: "16384".to_string(),
                disk_gb: "100".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rec = self.analyze(&reference);
        let costs = &rec.costs;

        if rec.target_state.services.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "reference workload produced no services".to_string(),
            ));
        }
        let expected_monthly =
            rec.services_monthly_cost() + costs.monthly_storage + costs.monthly_networking;
        if costs.total_monthly != expected_monthly
            || costs.annual != costs.total_monthly * Decimal::from(MONTHS_PER_YEAR)
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "inconsistent cost breakdown: monthly {} annual {}",
                costs.total_monthly, costs.annual
            )));
        }
        Ok(())
    }

    /// Analyze an inventory that may be absent
    ///
    /// A missing inventory is the only fatal input; no partial
    /// recommendation is produced for it.
    pub fn try_analyze(
        &self,
        inventory: Option<&ApplicationInventory>,
    ) -> Result<MigrationRecommendation> {
        inventory
            .map(|inv| self.analyze(inv))
            .ok_or_else(|| AnalysisError::InvalidInput("no inventory supplied".to_string()))
    }

    pub fn analyze(&self, inventory: &ApplicationInventory) -> MigrationRecommendation {
        self.analyze_detailed(inventory).recommendation
    }

    /// Analyze and keep the parse diagnostics and timing
    pub fn analyze_detailed(&self, inventory: &ApplicationInventory) -> AnalysisOutcome {
        let start = Instant::now();
        let config = &self.config;

        let normalized = normalize(inventory);
        let aggregates = normalized.aggregates;

        let pricing = CostEstimator::new(&config.tiers, &config.costs);
        let services = SizingClassifier::new(
            &config.tiers,
            &pricing,
            &config.virtual_machine,
            &config.managed_platform,
        )
        .recommend(&aggregates, &inventory.languages);

        let costs = pricing.breakdown(&services);

        let region = config.regions.resolve(&inventory.servers).to_string();

        let slots = TemplateSlots {
            languages: &inventory.languages,
            hosting_model: &inventory.hosting_model,
            production: normalized.counts.production,
            non_production: normalized.counts.non_production,
            region: &region,
        };
        let assessment = Assessor::new(&config.assessment).assess(&inventory.criticality, &slots);

        let recommendation = MigrationRecommendation {
            application_id: inventory.application_id.clone(),
            application_name: inventory.application_name.clone(),
            application_acronym: inventory.application_acronym.clone(),
            current_state: CurrentState {
                total_servers: normalized.counts.total,
                production_servers: normalized.counts.production,
                non_production_servers: normalized.counts.non_production,
                servers: normalized.servers,
                aggregates,
                hosting_model: inventory.hosting_model.clone(),
                technologies: normalized.technologies,
                business_criticality: inventory.criticality.clone(),
            },
            target_state: TargetState {
                services,
                region,
                security: assessment.security,
            },
            key_recommendations: assessment.key_recommendations,
            complexity: assessment.complexity,
            costs,
            risks: assessment.risks,
        };

        let elapsed = start.elapsed();
        debug!(
            application = %recommendation.application_name,
            services = recommendation.target_state.services.len(),
            total_monthly = %recommendation.costs.total_monthly,
            elapsed_us = elapsed.as_micros() as u64,
            "Recommendation assembled"
        );

        AnalysisOutcome {
            recommendation,
            parse_failures: normalized.parse_failures,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComplexityLevel;
    use crate::sizing::TierTable;

    fn server(name: &str, cores: &str, memory_mb: &str, disk_gb: &str, city: &str) -> ServerRecord {
        ServerRecord {
            name: name.to_string(),
            environment: "Production".to_string(),
            operating_system: "Windows Server 2016".to_string(),
            cores: cores.to_string(),
            memory_mb: memory_mb.to_string(),
            disk_gb: disk_gb.to_string(),
            city: city.to_string(),
            state: "CO".to_string(),
            ..Default::default()
        }
    }

    fn claims_portal() -> ApplicationInventory {
        ApplicationInventory {
            application_id: "1042".to_string(),
            application_name: "Claims Portal".to_string(),
            application_acronym: "CLP".to_string(),
            criticality: "Critical".to_string(),
            languages: "C#, JavaScript".to_string(),
            total_servers: "2".to_string(),
            production_servers: "1".to_string(),
            non_production_servers: "1".to_string(),
            hosting_model: "On-Premises".to_string(),
            servers: vec![
                server("clp-web01", "8", "32768", "500", "Denver"),
                server("clp-app01", "4", "8192", "250", "Denver"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let recommendation = Analyzer::default().analyze(&claims_portal());

        let aggregates = recommendation.current_state.aggregates;
        assert_eq!(aggregates.total_cores, 12);
        assert_eq!(aggregates.memory_gb(), 40);

        let services = &recommendation.target_state.services;
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service_type, "App Service");
        assert_eq!(services[0].estimated_monthly_cost, Decimal::new(29200, 2));
        assert_eq!(services[1].sku, "Standard_D8s_v5");
        assert_eq!(services[1].estimated_monthly_cost, Decimal::new(35000, 2));

        assert_eq!(recommendation.costs.total_monthly, Decimal::new(71700, 2));
        assert_eq!(recommendation.costs.annual, Decimal::new(860400, 2));
        assert_eq!(recommendation.complexity.overall, ComplexityLevel::High);
        assert_eq!(recommendation.target_state.region, "West US 2");
    }

    #[test]
    fn test_cost_invariants_hold() {
        let analyzer = Analyzer::default();
        let mut inventories = vec![claims_portal(), ApplicationInventory::default()];

        let mut small = claims_portal();
        small.languages = "Java".to_string();
        small.servers = vec![server("tiny", "1", "2048", "20", "Omaha")];
        inventories.push(small);

        for inventory in &inventories {
            let rec = analyzer.analyze(inventory);
            let overhead = rec.costs.monthly_storage + rec.costs.monthly_networking;
            assert_eq!(overhead, Decimal::new(7500, 2));
            assert_eq!(rec.costs.total_monthly, rec.services_monthly_cost() + overhead);
            assert_eq!(rec.costs.annual, rec.costs.total_monthly * Decimal::from(12));
        }
    }

    #[test]
    fn test_malformed_server_does_not_abort() {
        let mut inventory = claims_portal();
        inventory.servers.push(server("broken", "n/a", "lots", "", "Denver"));

        let outcome = Analyzer::default().analyze_detailed(&inventory);
        assert_eq!(outcome.recommendation.current_state.aggregates.total_cores, 12);
        assert_eq!(outcome.recommendation.current_state.servers.len(), 3);
        assert_eq!(outcome.parse_failures.len(), 3);
    }

    #[test]
    fn test_non_critical_is_medium() {
        let mut inventory = claims_portal();
        inventory.criticality = "Non-Critical".to_string();
        let rec = Analyzer::default().analyze(&inventory);
        assert_eq!(rec.complexity.overall, ComplexityLevel::Medium);
    }

    #[test]
    fn test_declared_counts_flow_into_templates() {
        let mut inventory = claims_portal();
        inventory.production_servers = "3".to_string();
        inventory.non_production_servers = "6".to_string();

        let rec = Analyzer::default().analyze(&inventory);
        assert_eq!(rec.current_state.production_servers, 3);
        assert!(rec
            .complexity
            .factors
            .contains(&"Multiple environments: 3 Prod, 6 Non-Prod".to_string()));
        assert_eq!(
            rec.key_recommendations.last().map(String::as_str),
            Some("Deploy in West US 2 region for optimal performance")
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze(&claims_portal());
        let second = analyzer.analyze(&claims_portal());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.costs).unwrap(),
            serde_json::to_string(&second.costs).unwrap()
        );
    }

    #[test]
    fn test_missing_inventory_is_invalid_input() {
        let err = Analyzer::default().try_analyze(None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let inventory = claims_portal();
        assert!(Analyzer::default().try_analyze(Some(&inventory)).is_ok());
    }

    #[test]
    fn test_custom_config_is_used() {
        let mut config = EngineConfig::default();
        config.costs.migration = Decimal::new(4200000, 2);
        config.assessment.estimated_timeframe = "9-12 months".to_string();

        let rec = Analyzer::new(config).unwrap().analyze(&claims_portal());
        assert_eq!(rec.costs.migration, Decimal::new(4200000, 2));
        assert_eq!(rec.complexity.estimated_timeframe, "9-12 months");
    }

    #[test]
    fn test_vm_price_is_rounded_from_tier_table() {
        let defaults = TierTable::default();
        let mut bands = defaults.bands().to_vec();
        bands[0].monthly_cost = Decimal::new(350125, 3);
        let mut config = EngineConfig::default();
        config.tiers = TierTable::new(bands, defaults.default_tier().clone()).unwrap();

        let rec = Analyzer::new(config).unwrap().analyze(&claims_portal());
        assert_eq!(rec.target_state.services[1].estimated_monthly_cost.to_string(), "350.13");
        assert_eq!(rec.costs.total_monthly.to_string(), "717.13");
    }

    #[test]
    fn test_self_check_passes_for_default_tables() {
        assert!(Analyzer::default().self_check().is_ok());
    }

    #[test]
    fn test_analyzer_is_shareable_across_threads() {
        let analyzer = std::sync::Arc::new(Analyzer::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = analyzer.clone();
                std::thread::spawn(move || analyzer.analyze(&claims_portal()).costs.total_monthly)
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Decimal::new(71700, 2));
        }
    }
}
