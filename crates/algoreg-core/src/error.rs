//! # Error Types
//!
//! Every registry rejects a transition with one of three outcomes, carried
//! by [`RegistryError`]:
//!
//! - `NotFound`: the referenced id has no record.
//! - `Unauthorized`: the caller failed the operation's authority check.
//! - `CapacityExceeded`: a bounded collection is already full.
//!
//! All three are terminal for the single call and leave state untouched.
//! Callers treat them as ordinary outcomes, not as system faults.
//!
//! Configuration loading, canonicalization and snapshot restore have their
//! own error enums since they happen outside a transition.

use thiserror::Error;

use crate::identity::{Identity, ProjectId};

/// The kind of record an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// An algorithm submission.
    Algorithm,
    /// A certified-algorithm token.
    Token,
    /// A research project.
    Project,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Algorithm => "algorithm",
            Self::Token => "token",
            Self::Project => "project",
        };
        f.write_str(s)
    }
}

/// The authority a caller must hold for a gated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorityRole {
    /// The single registry-wide privileged identity (certify, revoke, mint).
    Privileged,
    /// The current owner of a token (transfer).
    Owner,
    /// The lead researcher of a project (membership growth).
    LeadResearcher,
    /// Any member of a project (contribution).
    Collaborator,
}

impl std::fmt::Display for AuthorityRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Privileged => "PRIVILEGED",
            Self::Owner => "OWNER",
            Self::LeadResearcher => "LEAD_RESEARCHER",
            Self::Collaborator => "COLLABORATOR",
        };
        f.write_str(s)
    }
}

/// A rejected registry transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The operation referenced an id with no record.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Which registry was queried.
        kind: RecordKind,
        /// The id that had no record.
        id: u64,
    },

    /// The caller does not hold the required authority.
    #[error("caller {caller} is not authorized: requires {required}")]
    Unauthorized {
        /// The identity that attempted the transition.
        caller: Identity,
        /// The authority the transition requires.
        required: AuthorityRole,
    },

    /// The project's collaborator list is already at its limit.
    #[error("{project} has reached the maximum of {limit} collaborators")]
    CapacityExceeded {
        /// The project that is full.
        project: ProjectId,
        /// The configured collaborator cap.
        limit: usize,
    },
}

impl RegistryError {
    /// Shorthand for the `Unauthorized` variant.
    pub fn unauthorized(caller: &Identity, required: AuthorityRole) -> Self {
        Self::Unauthorized {
            caller: caller.clone(),
            required,
        }
    }

    /// Whether this is a `NotFound` rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is an `Unauthorized` rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether this is a `CapacityExceeded` rejection.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Error while loading or validating a [`crate::RegistryConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the schema.
    #[error("invalid config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A field holds a value the registries cannot operate with.
    #[error("invalid config field {field}: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// A timestamp string could not be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A snapshot violates a registry invariant and cannot be restored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The snapshot's counter is too close to the end of the id space to resume.
    #[error("{kind} counter {last} exceeds the resumable maximum {max}")]
    CounterOutOfRange {
        /// Which registry.
        kind: RecordKind,
        /// The counter value in the snapshot.
        last: u64,
        /// Highest counter a registry resumes from.
        max: u64,
    },

    /// A record id is zero or beyond the snapshot's counter.
    #[error("{kind} id {id} is outside the allocated range 1..={last}")]
    IdOutOfRange {
        /// Which registry.
        kind: RecordKind,
        /// Offending id.
        id: u64,
        /// The counter value in the snapshot.
        last: u64,
    },

    /// Two records share one id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId {
        /// Which registry.
        kind: RecordKind,
        /// Duplicated id.
        id: u64,
    },

    /// A project's collaborator list does not start with its lead researcher.
    #[error("{project}: first collaborator must be the lead researcher")]
    LeadNotFirst {
        /// Offending project.
        project: ProjectId,
    },

    /// A project lists the same collaborator twice.
    #[error("{project}: duplicate collaborator {collaborator}")]
    DuplicateCollaborator {
        /// Offending project.
        project: ProjectId,
        /// Repeated identity.
        collaborator: Identity,
    },

    /// A project has more collaborators than the configured cap.
    #[error("{project}: {count} collaborators exceeds limit {limit}")]
    TooManyCollaborators {
        /// Offending project.
        project: ProjectId,
        /// Collaborators in the snapshot.
        count: usize,
        /// Configured cap.
        limit: usize,
    },

    /// A contribution references a project that does not exist.
    #[error("contribution by {contributor} references missing {project}")]
    OrphanContribution {
        /// Referenced project.
        project: ProjectId,
        /// Contributor on the entry.
        contributor: Identity,
    },

    /// A contribution was recorded for someone who is not a member.
    #[error("contribution by non-member {contributor} on {project}")]
    NonMemberContribution {
        /// Referenced project.
        project: ProjectId,
        /// Contributor on the entry.
        contributor: Identity,
    },

    /// Two contributions share one `(project, contributor)` key.
    #[error("duplicate contribution by {contributor} on {project}")]
    DuplicateContribution {
        /// Referenced project.
        project: ProjectId,
        /// Contributor on the entry.
        contributor: Identity,
    },

    /// A certified algorithm has no certification date, or a non-certified one has a date.
    #[error("algorithm {id}: status {status} inconsistent with certification date")]
    CertificationDateMismatch {
        /// Offending algorithm id.
        id: u64,
        /// Status in the snapshot.
        status: String,
    },
}

/// A ledger could not be built or restored.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A registry snapshot failed validation.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = RegistryError::NotFound {
            kind: RecordKind::Algorithm,
            id: 7,
        };
        assert_eq!(err.to_string(), "algorithm 7 not found");
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_display() {
        let err = RegistryError::unauthorized(&Identity::from("mallory"), AuthorityRole::Privileged);
        assert_eq!(
            err.to_string(),
            "caller mallory is not authorized: requires PRIVILEGED"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_capacity_display() {
        let err = RegistryError::CapacityExceeded {
            project: ProjectId::new(3),
            limit: 20,
        };
        assert_eq!(
            err.to_string(),
            "project:3 has reached the maximum of 20 collaborators"
        );
        assert!(err.is_capacity_exceeded());
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::IdOutOfRange {
            kind: RecordKind::Token,
            id: 9,
            last: 4,
        };
        assert_eq!(err.to_string(), "token id 9 is outside the allocated range 1..=4");
    }

    #[test]
    fn test_counter_out_of_range_display() {
        let err = SnapshotError::CounterOutOfRange {
            kind: RecordKind::Project,
            last: u64::MAX,
            max: 9_223_372_036_854_775_807,
        };
        assert_eq!(
            err.to_string(),
            "project counter 18446744073709551615 exceeds the resumable maximum 9223372036854775807"
        );
    }
}
