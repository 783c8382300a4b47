//! Adapter implementations for the tracker module.
//!
//! This module provides concrete implementations of the tracker ports,
//! following hexagonal architecture principles. Adapters handle all
//! infrastructure concerns while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`github::GitHubProjectSource`]: GraphQL client for the GitHub
//!   ProjectV2 API with transparent cursor pagination
//! - [`memory::InMemoryTrackerRepository`]: Thread-safe in-memory storage
//!   for unit testing
//! - [`postgres::PostgresTrackerRepository`]: Production-grade `PostgreSQL`
//!   persistence using Diesel ORM

pub mod github;
pub mod memory;
pub mod postgres;
