//! Boardwatch: GitHub project board polling and aggregation service.
//!
//! This crate tracks the issues and pull requests attached to a GitHub
//! project board, periodically pulls their state, persists historical
//! snapshots, and derives point-in-time and trend statistics.
//!
//! # Architecture
//!
//! Boardwatch follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`config`]: Environment-driven daemon configuration
//! - [`tracker`]: Poll cycle, reconciliation, statistics, and backfill

pub mod config;
pub mod tracker;
