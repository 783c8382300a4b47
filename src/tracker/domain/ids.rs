//! Identifier and validated scalar types for the tracker domain.

use super::TrackerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized external repository identifier in `owner/repo` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Creates a validated repository name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::InvalidRepository`] if the value does
    /// not contain exactly one slash-delimited owner and repository segment.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let mut segments = normalized.split('/');
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !owner.is_empty()
            && !repo.is_empty()
            && !has_more_segments
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(TrackerDomainError::InvalidRepository(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the repository name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive issue or pull-request number from the external tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskNumber(u64);

impl TaskNumber {
    /// Largest number representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u64 = i64::MAX as u64;

    /// Creates a validated task number.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::InvalidTaskNumber`] when the value is
    /// zero or exceeds the schema-backed maximum (`i64::MAX`).
    pub const fn new(value: u64) -> Result<Self, TrackerDomainError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(TrackerDomainError::InvalidTaskNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable external task identity: repository plus issue/PR number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    repository: RepositoryName,
    number: TaskNumber,
}

impl TaskKey {
    /// Creates a task key from validated components.
    #[must_use]
    pub const fn new(repository: RepositoryName, number: TaskNumber) -> Self {
        Self { repository, number }
    }

    /// Creates a task key from raw external values.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerDomainError`] when either component is invalid.
    pub fn from_parts(repository: &str, number: u64) -> Result<Self, TrackerDomainError> {
        Ok(Self::new(
            RepositoryName::new(repository)?,
            TaskNumber::new(number)?,
        ))
    }

    /// Returns the repository identifier.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the issue or pull-request number.
    #[must_use]
    pub const fn number(&self) -> TaskNumber {
        self.number
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// Identity of the tracked project board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    organization: String,
    number: u32,
}

impl ProjectRef {
    /// Creates a validated project reference.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyOrganization`] when the login is
    /// blank or [`TrackerDomainError::InvalidProjectNumber`] when the
    /// project number is zero.
    pub fn new(organization: impl Into<String>, number: u32) -> Result<Self, TrackerDomainError> {
        let raw = organization.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TrackerDomainError::EmptyOrganization);
        }
        if number == 0 {
            return Err(TrackerDomainError::InvalidProjectNumber);
        }
        Ok(Self {
            organization: normalized.to_owned(),
            number,
        })
    }

    /// Returns the organization login.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the project number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/projects/{}", self.organization, self.number)
    }
}
