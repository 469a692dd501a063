//! Observability for the migration advisor
//!
//! Provides:
//! - Prometheus metrics (analysis latency, analyses, parse failures, narrative calls)
//! - Structured logging of domain events with tracing

use crate::engine::AnalysisOutcome;
use crate::inventory::FieldParseFailure;
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec, Gauge,
    Histogram, IntCounter, IntCounterVec,
};
use rust_decimal::prelude::ToPrimitive;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Histogram buckets for analysis latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5,
];

/// Process-wide metrics; `None` when registration failed
static GLOBAL_METRICS: OnceLock<Option<EngineMetricsInner>> = OnceLock::new();

struct EngineMetricsInner {
    analysis_latency_seconds: Histogram,
    analyses_total: IntCounter,
    parse_failures_total: IntCounterVec,
    narrative_requests_total: IntCounter,
    narrative_errors_total: IntCounter,
    last_monthly_cost: Gauge,
}

impl EngineMetricsInner {
    fn register() -> prometheus::Result<Self> {
        Ok(Self {
            analysis_latency_seconds: register_histogram!(
                "migration_advisor_analysis_latency_seconds",
                "Time spent building a migration recommendation",
                LATENCY_BUCKETS.to_vec()
            )?,

            analyses_total: register_int_counter!(
                "migration_advisor_analyses_total",
                "Total number of recommendations produced"
            )?,

            parse_failures_total: register_int_counter_vec!(
                "migration_advisor_parse_failures_total",
                "Numeric inventory fields that could not be parsed and were taken as zero",
                &["field"]
            )?,

            narrative_requests_total: register_int_counter!(
                "migration_advisor_narrative_requests_total",
                "Total number of follow-up questions sent to the narrator"
            )?,

            narrative_errors_total: register_int_counter!(
                "migration_advisor_narrative_errors_total",
                "Total number of failed narrator calls"
            )?,

            last_monthly_cost: register_gauge!(
                "migration_advisor_last_monthly_cost_dollars",
                "Estimated total monthly cost of the most recent recommendation"
            )?,
        })
    }

    fn get_or_register() -> Option<&'static Self> {
        GLOBAL_METRICS
            .get_or_init(|| match Self::register() {
                Ok(inner) => Some(inner),
                Err(e) => {
                    warn!(error = %e, "Failed to register engine metrics, metrics disabled");
                    None
                }
            })
            .as_ref()
    }
}

/// Engine metrics for Prometheus exposition
///
/// Handles are cheap; all clones share the process-wide registry entries.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        EngineMetricsInner::get_or_register();
        Self { _private: () }
    }

    fn inner(&self) -> Option<&'static EngineMetricsInner> {
        EngineMetricsInner::get_or_register()
    }

    /// Record everything about a finished analysis
    pub fn record_analysis(&self, outcome: &AnalysisOutcome) {
        let Some(inner) = self.inner() else {
            return;
        };
        inner
            .analysis_latency_seconds
            .observe(outcome.elapsed.as_secs_f64());
        inner.analyses_total.inc();
        for failure in &outcome.parse_failures {
            inner
                .parse_failures_total
                .with_label_values(&[failure.field])
                .inc();
        }
        if let Some(cost) = outcome.recommendation.costs.total_monthly.to_f64() {
            inner.last_monthly_cost.set(cost);
        }
    }

    pub fn inc_narrative_requests(&self) {
        if let Some(inner) = self.inner() {
            inner.narrative_requests_total.inc();
        }
    }

    pub fn inc_narrative_errors(&self) {
        if let Some(inner) = self.inner() {
            inner.narrative_errors_total.inc();
        }
    }
}

/// Structured logger for advisor events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a finished analysis and each recovered field
    pub fn log_analysis(&self, outcome: &AnalysisOutcome) {
        let rec = &outcome.recommendation;
        info!(
            event = "analysis_completed",
            instance = %self.instance,
            application_id = %rec.application_id,
            application = %rec.application_name,
            servers = rec.current_state.servers.len(),
            total_cores = rec.current_state.aggregates.total_cores,
            total_memory_gb = rec.current_state.aggregates.memory_gb(),
            services = rec.target_state.services.len(),
            region = %rec.target_state.region,
            complexity = %rec.complexity.overall,
            total_monthly = %rec.costs.total_monthly,
            parse_failures = outcome.parse_failures.len(),
            elapsed_us = outcome.elapsed.as_micros() as u64,
            "Migration recommendation produced"
        );

        for failure in &outcome.parse_failures {
            self.log_parse_failure(&rec.application_name, failure);
        }
    }

    pub fn log_parse_failure(&self, application: &str, failure: &FieldParseFailure) {
        warn!(
            event = "field_parse_failure",
            instance = %self.instance,
            application = %application,
            server = ?failure.server,
            field = failure.field,
            raw = %failure.raw,
            "Numeric field recovered as zero"
        );
    }

    pub fn log_narrative_answer(
        &self,
        application: &str,
        narrator: &str,
        elapsed: Duration,
        success: bool,
    ) {
        if success {
            info!(
                event = "narrative_answered",
                instance = %self.instance,
                application = %application,
                narrator = %narrator,
                elapsed_ms = elapsed.as_millis() as u64,
                "Follow-up question answered"
            );
        } else {
            warn!(
                event = "narrative_failed",
                instance = %self.instance,
                application = %application,
                narrator = %narrator,
                elapsed_ms = elapsed.as_millis() as u64,
                "Follow-up question could not be answered"
            );
        }
    }

    pub fn log_startup(&self, version: &str, narrator: &str) {
        info!(
            event = "service_started",
            instance = %self.instance,
            version = %version,
            narrator = %narrator,
            "Migration advisor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Migration advisor shutting down"
        );
    }
}
