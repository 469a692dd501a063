//! HTTP service around the migration advisor engine

pub mod api;
pub mod config;
