//! Inventory normalization
//!
//! Converts the free-text numeric columns of an [`ApplicationInventory`]
//! into typed server specs and summed aggregates. A malformed or missing
//! number never aborts an analysis: it counts as zero and is reported as a
//! [`FieldParseFailure`] diagnostic.

mod loader;

pub use loader::{lenient_list, load_inventory_json, null_as_default, text_or_number};

use crate::models::{Aggregates, ApplicationInventory, ServerCounts, ServerRecord, ServerSpec};
use serde::Serialize;
use tracing::debug;

/// Field names used in parse diagnostics
pub mod fields {
    pub const CORES: &str = "cores";
    pub const MEMORY_MB: &str = "memory_mb";
    pub const DISK_GB: &str = "disk_gb";
    pub const TOTAL_SERVERS: &str = "total_servers";
    pub const PRODUCTION_SERVERS: &str = "production_servers";
    pub const NON_PRODUCTION_SERVERS: &str = "non_production_servers";
}

/// A numeric field that could not be parsed and was substituted with zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldParseFailure {
    /// Server the field belongs to, `None` for application-level fields
    pub server: Option<String>,
    pub field: &'static str,
    pub raw: String,
}

/// Result of normalizing one inventory
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInventory {
    pub servers: Vec<ServerSpec>,
    pub aggregates: Aggregates,
    pub counts: ServerCounts,
    pub technologies: Vec<String>,
    pub parse_failures: Vec<FieldParseFailure>,
}

/// Parse a non-negative integer, tolerating surrounding whitespace
pub fn parse_quantity(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Split a comma-separated technology list, dropping empty entries
pub fn split_technologies(languages: &str) -> Vec<String> {
    languages
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize an inventory into server specs, aggregates and declared counts
pub fn normalize(inventory: &ApplicationInventory) -> NormalizedInventory {
    let mut parser = QuantityParser::default();

    let servers: Vec<ServerSpec> = inventory
        .servers
        .iter()
        .map(|server| parser.server_spec(server))
        .collect();

    let aggregates = servers.iter().fold(Aggregates::default(), |acc, s| Aggregates {
        total_cores: acc.total_cores.saturating_add(s.cores),
        total_memory_mb: acc.total_memory_mb.saturating_add(s.memory_mb),
        total_disk_gb: acc.total_disk_gb.saturating_add(s.disk_gb),
    });

    let counts = ServerCounts {
        total: parser.parse(None, fields::TOTAL_SERVERS, &inventory.total_servers),
        production: parser.parse(None, fields::PRODUCTION_SERVERS, &inventory.production_servers),
        non_production: parser.parse(
            None,
            fields::NON_PRODUCTION_SERVERS,
            &inventory.non_production_servers,
        ),
    };

    debug!(
        servers = servers.len(),
        total_cores = aggregates.total_cores,
        total_memory_mb = aggregates.total_memory_mb,
        total_disk_gb = aggregates.total_disk_gb,
        parse_failures = parser.failures.len(),
        "Inventory normalized"
    );

    NormalizedInventory {
        servers,
        aggregates,
        counts,
        technologies: split_technologies(&inventory.languages),
        parse_failures: parser.failures,
    }
}

/// Parses quantities and remembers every substitution it had to make
#[derive(Default)]
struct QuantityParser {
    failures: Vec<FieldParseFailure>,
}

impl QuantityParser {
    fn parse(&mut self, server: Option<&str>, field: &'static str, raw: &str) -> u64 {
        match parse_quantity(raw) {
            Some(value) => value,
            None => {
                debug!(server = ?server, field, raw = %raw, "Unparseable numeric field, using 0");
                self.failures.push(FieldParseFailure {
                    server: server.map(str::to_string),
                    field,
                    raw: raw.to_string(),
                });
                0
            }
        }
    }

    fn server_spec(&mut self, server: &ServerRecord) -> ServerSpec {
        let name = Some(server.name.as_str());
        ServerSpec {
            server_name: server.name.clone(),
            environment: server.environment.clone(),
            cores: self.parse(name, fields::CORES, &server.cores),
            memory_mb: self.parse(name, fields::MEMORY_MB, &server.memory_mb),
            disk_gb: self.parse(name, fields::DISK_GB, &server.disk_gb),
            operating_system: server.operating_system.clone(),
            location: format!("{}, {}", server.city, server.state),
        }
    }
}
