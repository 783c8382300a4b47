//! Project-board tracking for boardwatch.
//!
//! This module implements the polling-and-aggregation pipeline: fetching
//! raw project items from the source board, normalizing them into canonical
//! tasks, computing point-in-time statistics, reconciling tasks and
//! assignments against storage, recording daily snapshots and statistics,
//! and reconstructing a synthetic statistics history when none exists. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
