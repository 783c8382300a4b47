//! Environment-driven configuration for the boardwatch daemon.
//!
//! All settings are read from process environment variables. The project
//! identity (`GITHUB_TOKEN`, `BOARDWATCH_ORG`, `BOARDWATCH_PROJECT_NUMBER`)
//! and the database URL are required; the daemon must not start serving
//! without them. The remaining settings carry defaults.

use crate::tracker::domain::{ProjectRef, TrackerDomainError};
use std::env;
use thiserror::Error;

/// Default six-field cron expression: every five minutes.
const DEFAULT_POLL_CRON: &str = "0 */5 * * * *";

/// Default backfill window in days.
const DEFAULT_BACKFILL_DAYS: u32 = 30;

/// Default source fetch timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Errors raised while resolving daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unparsable value.
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Offending raw value.
        value: String,
        /// Parse failure description.
        reason: String,
    },

    /// The project identity fails domain validation.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// GitHub API token used for GraphQL requests.
    pub github_token: String,
    /// Project board identity (organization login and project number).
    pub project: ProjectRef,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Six-field cron expression driving the poll schedule.
    pub poll_cron: String,
    /// Backfill window length in days.
    pub backfill_days: u32,
    /// Source fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
}

impl TrackerConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value fails to parse. Startup must treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = require_var("GITHUB_TOKEN")?;
        let organization = require_var("BOARDWATCH_ORG")?;
        let project_number_raw = require_var("BOARDWATCH_PROJECT_NUMBER")?;
        let project_number: u32 = parse_var("BOARDWATCH_PROJECT_NUMBER", project_number_raw)?;
        let database_url = require_var("DATABASE_URL")?;

        let poll_cron =
            optional_var("BOARDWATCH_POLL_CRON").unwrap_or_else(|| DEFAULT_POLL_CRON.to_owned());
        let backfill_days = optional_var("BOARDWATCH_BACKFILL_DAYS")
            .map(|raw| parse_var("BOARDWATCH_BACKFILL_DAYS", raw))
            .transpose()?
            .unwrap_or(DEFAULT_BACKFILL_DAYS);
        let fetch_timeout_secs = optional_var("BOARDWATCH_FETCH_TIMEOUT_SECS")
            .map(|raw| parse_var("BOARDWATCH_FETCH_TIMEOUT_SECS", raw))
            .transpose()?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Ok(Self {
            github_token,
            project: ProjectRef::new(organization, project_number)?,
            database_url,
            poll_cron,
            backfill_days,
            fetch_timeout_secs,
        })
    }
}

/// Reads a required variable, treating empty values as missing.
fn require_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::MissingVar(name))
}

/// Reads an optional variable, treating empty values as absent.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Parses a variable value, reporting the variable name on failure.
fn parse_var<T>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ConfigError::InvalidVar {
        name,
        value: raw,
        reason: err.to_string(),
    })
}
