//! Complexity and risk assessment
//!
//! Complexity is derived from criticality alone. Every other statement is
//! a rendered template; nothing here invents new heuristics.

mod templates;

pub use templates::{render_all, AssessmentTemplates, Template, TemplateSlots};

use crate::models::{ComplexityAssessment, ComplexityLevel, SecurityRecommendations};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Criticality value (exact match) that lowers complexity to Medium
    pub non_critical_marker: String,
    /// Constant for this engine version, not scaled by inventory size
    pub estimated_timeframe: String,
    pub templates: AssessmentTemplates,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            non_critical_marker: "Non-Critical".to_string(),
            estimated_timeframe: "3-6 months".to_string(),
            templates: AssessmentTemplates::default(),
        }
    }
}

/// Everything the assessor contributes to a recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub complexity: ComplexityAssessment,
    pub key_recommendations: Vec<String>,
    pub security: SecurityRecommendations,
    pub risks: Vec<String>,
}

pub struct Assessor<'a> {
    config: &'a AssessmentConfig,
}

impl<'a> Assessor<'a> {
    pub fn new(config: &'a AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn complexity_level(&self, criticality: &str) -> ComplexityLevel {
        if criticality == self.config.non_critical_marker {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::High
        }
    }

    pub fn assess(&self, criticality: &str, slots: &TemplateSlots<'_>) -> Assessment {
        let templates = &self.config.templates;

        Assessment {
            complexity: ComplexityAssessment {
                overall: self.complexity_level(criticality),
                factors: render_all(&templates.complexity_factors, slots),
                estimated_timeframe: self.config.estimated_timeframe.clone(),
                prerequisites: render_all(&templates.prerequisites, slots),
            },
            key_recommendations: render_all(&templates.key_recommendations, slots),
            security: SecurityRecommendations {
                identity_and_access: render_all(&templates.identity_and_access, slots),
                network_security: render_all(&templates.network_security, slots),
                data_protection: render_all(&templates.data_protection, slots),
            },
            risks: render_all(&templates.risks, slots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> TemplateSlots<'static> {
        TemplateSlots {
            languages: "C#, JavaScript",
            hosting_model: "Dedicated",
            production: 2,
            non_production: 4,
            region: "East US",
        }
    }

    #[test]
    fn test_non_critical_is_medium() {
        let config = AssessmentConfig::default();
        let assessor = Assessor::new(&config);
        assert_eq!(assessor.complexity_level("Non-Critical"), ComplexityLevel::Medium);
    }

    #[test]
    fn test_anything_else_is_high() {
        let config = AssessmentConfig::default();
        let assessor = Assessor::new(&config);

        for criticality in ["Critical", "non-critical", "Non-Critical ", "", "Mission Critical"] {
            assert_eq!(
                assessor.complexity_level(criticality),
                ComplexityLevel::High,
                "criticality {:?}",
                criticality
            );
        }
    }

    #[test]
    fn test_assessment_renders_templates() {
        let config = AssessmentConfig::default();
        let assessment = Assessor::new(&config).assess("Critical", &slots());

        assert_eq!(assessment.complexity.overall, ComplexityLevel::High);
        assert_eq!(assessment.complexity.estimated_timeframe, "3-6 months");
        assert_eq!(
            assessment.complexity.factors,
            vec![
                "Application uses C#, JavaScript - Azure native support available",
                "Current hosting model: Dedicated",
                "Multiple environments: 2 Prod, 4 Non-Prod",
                "No disaster recovery plan currently in place",
            ]
        );
        assert_eq!(assessment.complexity.prerequisites.len(), 5);
        assert_eq!(
            assessment.key_recommendations.last().map(String::as_str),
            Some("Deploy in East US region for optimal performance")
        );
        assert_eq!(assessment.security.identity_and_access.len(), 3);
        assert_eq!(assessment.security.network_security.len(), 3);
        assert_eq!(assessment.security.data_protection.len(), 3);
        assert_eq!(assessment.risks.len(), 5);
    }

    #[test]
    fn test_assessment_is_deterministic() {
        let config = AssessmentConfig::default();
        let assessor = Assessor::new(&config);
        assert_eq!(
            assessor.assess("Critical", &slots()),
            assessor.assess("Critical", &slots())
        );
    }
}
