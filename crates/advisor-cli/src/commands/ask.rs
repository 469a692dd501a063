//! Follow-up question command

use advisor_lib::narrative::{NarrativeContext, NarrativeGenerator};
use advisor_lib::MigrationRecommendation;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

use crate::output::{print_info, print_json, OutputFormat};

/// A saved analysis: either the bare recommendation or an analyze response
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedAnalysis {
    Response { data: MigrationRecommendation },
    Bare(MigrationRecommendation),
}

impl SavedAnalysis {
    fn into_recommendation(self) -> MigrationRecommendation {
        match self {
            SavedAnalysis::Response { data } => data,
            SavedAnalysis::Bare(rec) => rec,
        }
    }
}

/// Read a recommendation saved by `analyze --save` or the HTTP service
pub fn load_analysis(file: &Path) -> Result<MigrationRecommendation> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read analysis file {}", file.display()))?;
    let saved: SavedAnalysis = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a saved migration analysis", file.display()))?;
    Ok(saved.into_recommendation())
}

/// Answer a question about a saved analysis
pub async fn run(
    narrator: &dyn NarrativeGenerator,
    file: &Path,
    question: &str,
    format: OutputFormat,
) -> Result<()> {
    let rec = load_analysis(file)?;
    let context = NarrativeContext::from_recommendation(&rec);

    let answer = narrator
        .answer(&context, question)
        .await
        .with_context(|| format!("The {} narrator could not answer", narrator.name()))?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "type": "answer",
            "application": context.application_name,
            "narrator": narrator.name(),
            "message": answer,
        }))?,
        OutputFormat::Table => {
            if narrator.is_offline() {
                print_info("No model endpoint configured, answering from the analysis alone");
            }
            println!("{} {}", "Q:".bold(), question.trim());
            println!();
            println!("{}", answer.trim_end());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_lib::{Analyzer, ApplicationInventory};

    #[test]
    fn test_load_bare_and_wrapped_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let rec = Analyzer::default().analyze(&ApplicationInventory {
            application_name: "Ledger".to_string(),
            ..Default::default()
        });

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(load_analysis(&bare).unwrap(), rec);

        let wrapped = dir.path().join("wrapped.json");
        let response = json!({ "type": "analysis", "message": "done", "data": rec });
        std::fs::write(&wrapped, response.to_string()).unwrap();
        assert_eq!(load_analysis(&wrapped).unwrap(), rec);
    }

    #[test]
    fn test_load_rejects_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(&path, r#"{ "application_Name": "Ledger", "mALServers": [] }"#).unwrap();
        assert!(load_analysis(&path).is_err());
    }
}
