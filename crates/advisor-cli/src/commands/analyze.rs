//! Inventory analysis command

use advisor_lib::{load_inventory_json, Analyzer, MigrationRecommendation};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabled::Tabled;
use tracing::debug;

use crate::output::{
    analysis_file_name, color_complexity, format_currency, format_memory_mb, print_heading,
    print_json, print_list, print_success, print_table, print_warning, OutputFormat,
};

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "Server")]
    name: String,
    #[tabled(rename = "Environment")]
    environment: String,
    #[tabled(rename = "Cores")]
    cores: u64,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Disk (GB)")]
    disk_gb: u64,
    #[tabled(rename = "Location")]
    location: String,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Cores")]
    cores: u64,
    #[tabled(rename = "Memory (GB)")]
    memory_gb: u64,
    #[tabled(rename = "Storage (GB)")]
    storage_gb: u64,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Analyze an inventory file and print the recommendation
pub fn run(
    analyzer: &Analyzer,
    file: &Path,
    save: bool,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read inventory file {}", file.display()))?;
    let inventory = load_inventory_json(&content)
        .with_context(|| format!("Invalid inventory file {}", file.display()))?;

    let outcome = analyzer.analyze_detailed(&inventory);
    debug!(elapsed_us = outcome.elapsed.as_micros() as u64, "Analysis finished");

    match format {
        OutputFormat::Json => print_json(&outcome.recommendation)?,
        OutputFormat::Table => {
            print_recommendation(&outcome.recommendation);
            for failure in &outcome.parse_failures {
                print_warning(&format!(
                    "{} {}: could not parse {:?}, counted as 0",
                    failure.server.as_deref().unwrap_or("application"),
                    failure.field,
                    failure.raw
                ));
            }
        }
    }

    if save {
        let path = save_analysis(&outcome.recommendation, output_dir)?;
        match format {
            OutputFormat::Json => eprintln!("Saved analysis to {}", path.display()),
            OutputFormat::Table => print_success(&format!("Saved analysis to {}", path.display())),
        }
    }

    Ok(())
}

/// Write the recommendation as pretty JSON and return the file path
pub fn save_analysis(rec: &MigrationRecommendation, output_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = output_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(analysis_file_name(&rec.application_name, chrono::Utc::now()));
    let content = serde_json::to_string_pretty(rec).context("Failed to serialize analysis")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

fn print_recommendation(rec: &MigrationRecommendation) {
    let current = &rec.current_state;
    let target = &rec.target_state;

    print_heading(
        &format!("Migration Analysis: {} ({})", rec.application_name, rec.application_acronym),
        '=',
    );
    println!("Application ID:         {}", rec.application_id);
    println!("Criticality:            {}", current.business_criticality);
    println!("Hosting model:          {}", current.hosting_model);
    println!("Technologies:           {}", current.technologies.join(", "));
    println!(
        "Servers:                {} ({} prod, {} non-prod)",
        current.total_servers, current.production_servers, current.non_production_servers
    );
    println!(
        "Totals:                 {} cores, {}, {} GB disk",
        current.aggregates.total_cores,
        format_memory_mb(current.aggregates.total_memory_mb),
        current.aggregates.total_disk_gb
    );
    println!();

    let servers: Vec<ServerRow> = current
        .servers
        .iter()
        .map(|s| ServerRow {
            name: s.server_name.clone(),
            environment: s.environment.clone(),
            cores: s.cores,
            memory: format_memory_mb(s.memory_mb),
            disk_gb: s.disk_gb,
            location: s.location.clone(),
        })
        .collect();
    print_heading("Current Servers", '-');
    print_table(&servers);
    println!();

    let services: Vec<ServiceRow> = target
        .services
        .iter()
        .map(|s| ServiceRow {
            service: s.service_name.clone(),
            sku: s.sku.clone(),
            size: s.size.clone(),
            cores: s.recommended_cores,
            memory_gb: s.recommended_memory_gb,
            storage_gb: s.recommended_storage_gb,
            monthly: format_currency(s.estimated_monthly_cost),
        })
        .collect();
    print_heading(&format!("Target Services ({})", target.region), '-');
    print_table(&services);
    println!();

    print_heading("Estimated Costs", '-');
    println!("Compute:                {}", format_currency(rec.costs.monthly_compute));
    println!("Storage:                {}", format_currency(rec.costs.monthly_storage));
    println!("Networking:             {}", format_currency(rec.costs.monthly_networking));
    println!(
        "{}         {}",
        "Total monthly:".bold(),
        format_currency(rec.costs.total_monthly).green().bold()
    );
    println!("Annual:                 {}", format_currency(rec.costs.annual));
    println!("One-time migration:     {}", format_currency(rec.costs.migration));
    println!("{}", rec.costs.optimization_tips.dimmed());
    println!();

    print_heading("Complexity", '-');
    println!("Overall:                {}", color_complexity(rec.complexity.overall));
    println!("Timeframe:              {}", rec.complexity.estimated_timeframe);
    println!();

    print_list("Complexity Factors", &rec.complexity.factors);
    print_list("Prerequisites", &rec.complexity.prerequisites);
    print_list("Key Recommendations", &rec.key_recommendations);
    print_list("Identity and Access", &target.security.identity_and_access);
    print_list("Network Security", &target.security.network_security);
    print_list("Data Protection", &target.security.data_protection);
    print_list("Risks", &rec.risks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_lib::{ApplicationInventory, ServerRecord};

    #[test]
    fn test_save_analysis_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = ApplicationInventory {
            application_name: "Claims Portal".to_string(),
            servers: vec![ServerRecord {
                cores: "2".to_string(),
                memory_mb: "8192".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rec = Analyzer::default().analyze(&inventory);

        let path = save_analysis(&rec, Some(dir.path())).unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("MigrationAnalysis_Claims_Portal_"));
        assert!(file_name.ends_with(".json"));

        let saved: MigrationRecommendation =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, rec);
    }
}
