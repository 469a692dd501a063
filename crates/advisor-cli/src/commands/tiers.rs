//! Tier table command

use advisor_lib::Analyzer;
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::output::{format_currency, print_heading, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Min Cores")]
    min_cores: String,
    #[tabled(rename = "Min Memory (GB)")]
    min_memory_gb: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Print the compute tiers and the managed platform offering in use
pub fn run(analyzer: &Analyzer, format: OutputFormat) -> Result<()> {
    let config = analyzer.config();

    match format {
        OutputFormat::Json => print_json(&config.tiers)?,
        OutputFormat::Table => {
            let band_count = config.tiers.bands().len();
            let rows: Vec<TierRow> = config
                .tiers
                .iter()
                .enumerate()
                .map(|(index, tier)| {
                    let fallback = index == band_count;
                    TierRow {
                        sku: tier.sku.clone(),
                        size: tier.size_label.clone(),
                        min_cores: if fallback { "-".to_string() } else { tier.min_cores.to_string() },
                        min_memory_gb: if fallback {
                            "-".to_string()
                        } else {
                            tier.min_memory_gb.to_string()
                        },
                        monthly: format_currency(tier.monthly_cost),
                    }
                })
                .collect();

            print_heading("Compute Tiers", '=');
            print_table(&rows);
            println!();

            let managed = &config.managed_platform;
            print_heading("Managed Platform", '-');
            println!(
                "{} {} at {} when languages mention {}",
                managed.service_name.bold(),
                managed.sku,
                format_currency(managed.monthly_cost),
                managed.runtime_markers.join(", ")
            );
        }
    }

    Ok(())
}
