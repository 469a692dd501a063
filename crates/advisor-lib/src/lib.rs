//! Migration advisor library
//!
//! Turns an application's server inventory into a structured cloud
//! migration recommendation:
//! - Inventory normalization and aggregation
//! - Tier-based compute sizing and cost estimation
//! - Complexity, security and risk assessment
//! - Target region resolution
//! - Narrative answers to follow-up questions
//! - Health checks and observability

pub mod assessment;
pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod health;
pub mod inventory;
pub mod models;
pub mod narrative;
pub mod observability;
pub mod region;
pub mod sizing;

pub use config::EngineConfig;
pub use engine::{AnalysisOutcome, Analyzer};
pub use error::{AnalysisError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, Components, HealthRegistry, HealthResponse,
    ReadinessResponse,
};
pub use inventory::load_inventory_json;
pub use models::*;
pub use narrative::{NarrativeContext, NarrativeGenerator};
pub use observability::{EngineMetrics, StructuredLogger};
