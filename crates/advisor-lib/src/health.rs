//! Health of the advisor service
//!
//! Two components are tracked. The engine is healthy once its self-check
//! passes. The narrator is healthy while a model endpoint answers, and
//! degraded when answering offline or after a failed call.

use crate::engine::Analyzer;
use crate::narrative::NarrativeGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

/// Ordered worst-last, so the overall status is the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    pub fn is_operational(&self) -> bool {
        *self != ComponentStatus::Unhealthy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ComponentHealth {
    fn new(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            checked_at: Utc::now(),
        }
    }
}

/// Per-component health, keyed by component name on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    pub engine: ComponentHealth,
    pub narrator: ComponentHealth,
}

impl Components {
    pub fn overall(&self) -> ComponentStatus {
        self.engine.status.max(self.narrator.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: Components,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug)]
struct HealthState {
    components: Components,
    ready: bool,
}

/// Shared health state for the service probes
#[derive(Debug, Clone)]
pub struct HealthRegistry {
    state: Arc<RwLock<HealthState>>,
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthRegistry {
    /// Nothing has been checked yet: the engine counts as unhealthy until
    /// [`observe_engine`](Self::observe_engine) runs
    pub fn new() -> Self {
        let pending = Some("not yet checked".to_string());
        Self {
            state: Arc::new(RwLock::new(HealthState {
                components: Components {
                    engine: ComponentHealth::new(ComponentStatus::Unhealthy, pending.clone()),
                    narrator: ComponentHealth::new(ComponentStatus::Degraded, pending),
                },
                ready: false,
            })),
        }
    }

    /// Run the analyzer's self-check and record the result
    pub async fn observe_engine(&self, analyzer: &Analyzer) -> ComponentStatus {
        let health = match analyzer.self_check() {
            Ok(()) => ComponentHealth::new(ComponentStatus::Healthy, None),
            Err(e) => {
                error!(error = %e, "Engine self-check failed");
                ComponentHealth::new(ComponentStatus::Unhealthy, Some(e.to_string()))
            }
        };
        let status = health.status;
        self.state.write().await.components.engine = health;
        status
    }

    /// Narrator status follows its mode: offline answers are degraded service
    pub async fn observe_narrator(&self, narrator: &dyn NarrativeGenerator) {
        let health = if narrator.is_offline() {
            ComponentHealth::new(
                ComponentStatus::Degraded,
                Some("no model endpoint configured, answering offline".to_string()),
            )
        } else {
            ComponentHealth::new(ComponentStatus::Healthy, None)
        };
        self.state.write().await.components.narrator = health;
    }

    /// Fold the outcome of a narrator call into its status
    pub async fn record_narrator_call(
        &self,
        narrator: &dyn NarrativeGenerator,
        failure: Option<&str>,
    ) {
        match failure {
            None => self.observe_narrator(narrator).await,
            Some(reason) => {
                warn!(narrator = %narrator.name(), reason = %reason, "Narrator marked degraded");
                self.state.write().await.components.narrator = ComponentHealth::new(
                    ComponentStatus::Degraded,
                    Some(format!("last request failed: {}", reason)),
                );
            }
        }
    }

    pub async fn set_ready(&self, ready: bool) {
        self.state.write().await.ready = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let state = self.state.read().await;
        HealthResponse {
            status: state.components.overall(),
            components: state.components.clone(),
        }
    }

    /// Ready once startup finished and the engine is usable; a degraded
    /// narrator does not block readiness
    pub async fn readiness(&self) -> ReadinessResponse {
        let state = self.state.read().await;
        let reason = if !state.ready {
            Some("Advisor not yet initialized")
        } else if !state.components.engine.status.is_operational() {
            Some("Engine unhealthy")
        } else {
            None
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}
