//! Statement templates with named slots
//!
//! A template is plain text where `{slot}` is replaced by the matching
//! value. Unknown slots are left as written.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Values available to templates
#[derive(Debug, Clone, Copy)]
pub struct TemplateSlots<'a> {
    pub languages: &'a str,
    pub hosting_model: &'a str,
    pub production: u64,
    pub non_production: u64,
    pub region: &'a str,
}

impl TemplateSlots<'_> {
    fn lookup(&self, name: &str, out: &mut String) -> bool {
        match name {
            "languages" => out.push_str(self.languages),
            "hosting_model" => out.push_str(self.hosting_model),
            "production" => {
                let _ = write!(out, "{}", self.production);
            }
            "non_production" => {
                let _ = write!(out, "{}", self.non_production);
            }
            "region" => out.push_str(self.region),
            _ => return false,
        }
        true
    }
}

/// A single statement template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, slots: &TemplateSlots<'_>) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    if !slots.lookup(name, &mut out) {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Render every template of a set, preserving order
pub fn render_all(templates: &[Template], slots: &TemplateSlots<'_>) -> Vec<String> {
    templates.iter().map(|t| t.render(slots)).collect()
}

fn set(lines: &[&str]) -> Vec<Template> {
    lines.iter().map(|line| Template::new(*line)).collect()
}

/// Statement sets used in every recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentTemplates {
    pub complexity_factors: Vec<Template>,
    pub prerequisites: Vec<Template>,
    pub key_recommendations: Vec<Template>,
    pub identity_and_access: Vec<Template>,
    pub network_security: Vec<Template>,
    pub data_protection: Vec<Template>,
    pub risks: Vec<Template>,
}

impl Default for AssessmentTemplates {
    fn default() -> Self {
        Self {
            complexity_factors: set(&[
                "Application uses {languages} - Azure native support available",
                "Current hosting model: {hosting_model}",
                "Multiple environments: {production} Prod, {non_production} Non-Prod",
                "No disaster recovery plan currently in place",
            ]),
            prerequisites: set(&[
                "Azure subscription and governance setup",
                "Network connectivity planning (ExpressRoute or VPN)",
                "Security and compliance review",
                "Application dependency mapping",
                "Performance baseline establishment",
            ]),
            key_recommendations: set(&[
                "Consider Azure App Service for the C# application to reduce operational overhead",
                "Implement Azure SQL Database instead of on-premises databases for better scalability",
                "Use Azure Application Gateway for load balancing and SSL termination",
                "Implement Azure Key Vault for secure credential management",
                "Set up Azure Monitor and Application Insights for comprehensive monitoring",
                "Consider Azure DevOps for CI/CD pipeline automation",
                "Deploy in {region} region for optimal performance",
            ]),
            identity_and_access: set(&[
                "Implement Azure Active Directory integration",
                "Enable multi-factor authentication (MFA)",
                "Use managed identities for Azure resource access",
            ]),
            network_security: set(&[
                "Deploy within Azure Virtual Network with appropriate subnets",
                "Configure Network Security Groups (NSGs)",
                "Implement Azure Firewall or Application Gateway WAF",
            ]),
            data_protection: set(&[
                "Enable encryption at rest for all storage",
                "Use Azure Key Vault for certificate and secret management",
                "Implement Azure Backup for data protection",
            ]),
            risks: set(&[
                "Application dependency on specific on-premises systems may require additional integration work",
                "Data migration requires careful planning to minimize downtime",
                "Legacy .NET Framework applications may need modernization",
                "Current lack of DR plan requires immediate attention post-migration",
                "User training may be required for new Azure-based workflows",
            ]),
        }
    }
}
