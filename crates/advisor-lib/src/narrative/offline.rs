use super::{validate_question, NarrativeContext, NarrativeGenerator};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt::Write;

/// Answers from the context alone, without a model
///
/// Picks a topic from keywords in the question and otherwise returns a
/// digest of the analysis. Output depends only on its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Costs,
    Timeline,
    Risks,
    Overview,
}

impl Topic {
    fn of(question: &str) -> Self {
        let q = question.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| q.contains(w));

        if mentions(&["cost", "price", "budget", "spend"]) {
            Topic::Costs
        } else if mentions(&["timeline", "how long", "phase", "schedule", "duration"]) {
            Topic::Timeline
        } else if mentions(&["risk", "concern", "issue"]) {
            Topic::Risks
        } else {
            Topic::Overview
        }
    }
}

impl OfflineNarrator {
    pub fn new() -> Self {
        Self
    }

    fn compose(&self, ctx: &NarrativeContext, question: &str) -> String {
        let mut out = String::new();
        match Topic::of(question) {
            Topic::Costs => {
                let _ = writeln!(
                    out,
                    "{} is estimated at ${:.2} per month (${:.2} per year) in {}.",
                    ctx.application_name, ctx.monthly_cost, ctx.annual_cost, ctx.region
                );
                let _ = writeln!(
                    out,
                    "The one-time migration effort is estimated at ${:.2}.",
                    ctx.migration_cost
                );
            }
            Topic::Timeline => {
                let _ = writeln!(
                    out,
                    "The migration of {} is expected to take {} at {} complexity.",
                    ctx.application_name, ctx.estimated_timeframe, ctx.complexity
                );
                let _ = writeln!(out, "Prerequisites:");
                for item in &ctx.prerequisites {
                    let _ = writeln!(out, "- {}", item);
                }
            }
            Topic::Risks => {
                let _ = writeln!(out, "Migration risks for {}:", ctx.application_name);
                for item in &ctx.risks {
                    let _ = writeln!(out, "- {}", item);
                }
            }
            Topic::Overview => {
                let _ = writeln!(
                    out,
                    "{} runs on {} servers with {} cores and {}GB of memory in total.",
                    ctx.application_name, ctx.server_count, ctx.total_cores, ctx.total_memory_gb
                );
                let _ = writeln!(
                    out,
                    "Migration complexity is {}, with an estimated timeline of {} and a monthly cost of ${:.2} in {}.",
                    ctx.complexity, ctx.estimated_timeframe, ctx.monthly_cost, ctx.region
                );
            }
        }
        out
    }
}

#[async_trait]
impl NarrativeGenerator for OfflineNarrator {
    fn name(&self) -> &str {
        "offline"
    }

    fn is_offline(&self) -> bool {
        true
    }

    async fn answer(&self, context: &NarrativeContext, question: &str) -> Result<String> {
        let question = validate_question(question)?;
        Ok(self.compose(context, question))
    }
}
