//! Shared types, errors, and configuration for Soquy.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money and calendar helpers with decimal precision
//! - Pagination types for list queries
//! - Application-wide error types
//! - Configuration management and tracing setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{AppConfig, LedgerConfig, LogConfig};
pub use error::AppError;
