//! Free-text answers about a finished recommendation
//!
//! The engine never depends on a narrative generator. Callers hand one a
//! [`NarrativeContext`] snapshot and a question; what comes back is prose
//! and is never parsed back into structured fields.

mod chat;
mod offline;
pub mod prompts;

pub use chat::{ChatCompletionsConfig, ChatCompletionsNarrator};
pub use offline::OfflineNarrator;

use crate::error::{AnalysisError, Result};
use crate::models::{ComplexityLevel, MigrationRecommendation};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structured snapshot of a recommendation handed to a narrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContext {
    pub application_name: String,
    pub server_count: u64,
    pub total_cores: u64,
    pub total_memory_gb: u64,
    pub complexity: ComplexityLevel,
    pub estimated_timeframe: String,
    pub monthly_cost: Decimal,
    pub annual_cost: Decimal,
    pub migration_cost: Decimal,
    pub region: String,
    pub risks: Vec<String>,
    pub prerequisites: Vec<String>,
}

impl NarrativeContext {
    pub fn from_recommendation(rec: &MigrationRecommendation) -> Self {
        let aggregates = rec.current_state.aggregates;
        Self {
            application_name: rec.application_name.clone(),
            server_count: rec.current_state.total_servers,
            total_cores: aggregates.total_cores,
            total_memory_gb: aggregates.memory_gb(),
            complexity: rec.complexity.overall,
            estimated_timeframe: rec.complexity.estimated_timeframe.clone(),
            monthly_cost: rec.costs.total_monthly,
            annual_cost: rec.costs.annual,
            migration_cost: rec.costs.migration,
            region: rec.target_state.region.clone(),
            risks: rec.risks.clone(),
            prerequisites: rec.complexity.prerequisites.clone(),
        }
    }
}

/// Produces free-text answers to follow-up questions
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Short identifier used in logs and health messages
    fn name(&self) -> &str;

    /// Whether answers are produced locally without a model endpoint
    fn is_offline(&self) -> bool {
        false
    }

    async fn answer(&self, context: &NarrativeContext, question: &str) -> Result<String>;
}

/// Chat-completions narrator when an endpoint is configured, offline otherwise
pub fn build_narrator(config: Option<&ChatCompletionsConfig>) -> Result<Arc<dyn NarrativeGenerator>> {
    match config {
        Some(config) => Ok(Arc::new(ChatCompletionsNarrator::new(config)?)),
        None => Ok(Arc::new(OfflineNarrator::new())),
    }
}

/// Trim a question and reject it when nothing is left
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "question must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
