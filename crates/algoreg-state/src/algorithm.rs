//! # Algorithm Submission and Certification
//!
//! Anyone may submit an algorithm; only the privileged identity may
//! certify or revoke it.
//!
//! ## States
//!
//! ```text
//! submit ──▶ Pending ──▶ Certified ◀──▶ Revoked
//!               │                        ▲
//!               └────────────────────────┘
//! ```
//!
//! Certify is accepted from any state. Certifying an already certified
//! record re-stamps its date; certifying a revoked one re-certifies it.
//! Revoke is accepted from any state and always clears the date. Records
//! are never deleted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use algoreg_core::{
    AlgorithmId, AuthorityRole, Clock, IdSequence, Identity, RecordKind, RegistryConfig,
    RegistryError, SnapshotError, SystemClock, Timestamp,
};

use crate::authority::{can_certify, can_revoke, require};
use crate::rejected;

// ─── Algorithm Status ────────────────────────────────────────────────

/// Certification status of a submitted algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmStatus {
    /// Submitted, not yet reviewed.
    Pending,
    /// Vetted by the privileged identity.
    Certified,
    /// Certification withdrawn.
    Revoked,
}

impl AlgorithmStatus {
    /// Whether the algorithm currently holds a certification.
    pub fn is_certified(&self) -> bool {
        matches!(self, Self::Certified)
    }
}

impl std::fmt::Display for AlgorithmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Certified => "CERTIFIED",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

// ─── Algorithm Record ────────────────────────────────────────────────

/// A submitted algorithm and its certification state.
///
/// `submitter`, `name`, `description` and `implementation` are fixed at
/// submission. `certification_date` is `Some` exactly when the status is
/// `Certified`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmRecord {
    /// Registry-assigned id.
    pub id: AlgorithmId,
    /// Who submitted it.
    pub submitter: Identity,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Opaque implementation payload.
    pub implementation: String,
    /// Current certification status.
    pub status: AlgorithmStatus,
    /// When the current certification was granted.
    pub certification_date: Option<Timestamp>,
}

impl AlgorithmRecord {
    /// Whether the algorithm currently holds a certification.
    pub fn is_certified(&self) -> bool {
        self.status.is_certified()
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// Persisted form of an [`AlgorithmRegistry`]: the counter plus every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmRegistrySnapshot {
    /// Last id assigned.
    pub last_id: u64,
    /// All records in ascending id order.
    pub records: Vec<AlgorithmRecord>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// Owns algorithm records and their certification status.
#[derive(Debug)]
pub struct AlgorithmRegistry<C = SystemClock> {
    authority: Identity,
    sequence: IdSequence,
    records: BTreeMap<AlgorithmId, AlgorithmRecord>,
    clock: C,
}

impl AlgorithmRegistry<SystemClock> {
    /// An empty registry stamping certifications with the system clock.
    pub fn new(config: &RegistryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> AlgorithmRegistry<C> {
    /// An empty registry reading time from `clock`.
    ///
    /// `config` is taken as already validated ([`RegistryConfig::validate`]);
    /// [`crate::Ledger`] checks it before building its registries.
    pub fn with_clock(config: &RegistryConfig, clock: C) -> Self {
        Self {
            authority: config.privileged_identity.clone(),
            sequence: IdSequence::new(),
            records: BTreeMap::new(),
            clock,
        }
    }

    /// Submit a new algorithm. Always succeeds; the record starts `Pending`.
    pub fn submit(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        implementation: impl Into<String>,
        submitter: &Identity,
    ) -> AlgorithmId {
        let id = AlgorithmId::new(self.sequence.allocate());
        let record = AlgorithmRecord {
            id,
            submitter: submitter.clone(),
            name: name.into(),
            description: description.into(),
            implementation: implementation.into(),
            status: AlgorithmStatus::Pending,
            certification_date: None,
        };
        tracing::info!(algorithm_id = %id, submitter = %submitter, name = %record.name, "algorithm submitted");
        self.records.insert(id, record);
        id
    }

    /// Certify an algorithm, stamping the current time.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` has no record.
    /// - `Unauthorized` if `caller` is not the privileged identity.
    pub fn certify(&mut self, id: AlgorithmId, caller: &Identity) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| rejected("certify", not_found(id)))?;
        require(can_certify(caller, &self.authority), caller, AuthorityRole::Privileged)
            .map_err(|e| rejected("certify", e))?;

        let now = self.clock.now();
        let previous = record.status;
        record.status = AlgorithmStatus::Certified;
        record.certification_date = Some(now);
        tracing::info!(algorithm_id = %id, from = %previous, certified_at = %now, "algorithm certified");
        Ok(())
    }

    /// Revoke an algorithm's certification, clearing its date.
    ///
    /// Accepted regardless of the current status.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` has no record.
    /// - `Unauthorized` if `caller` is not the privileged identity.
    pub fn revoke(&mut self, id: AlgorithmId, caller: &Identity) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| rejected("revoke", not_found(id)))?;
        require(can_revoke(caller, &self.authority), caller, AuthorityRole::Privileged)
            .map_err(|e| rejected("revoke", e))?;

        let previous = record.status;
        record.status = AlgorithmStatus::Revoked;
        record.certification_date = None;
        tracing::info!(algorithm_id = %id, from = %previous, "algorithm certification revoked");
        Ok(())
    }

    /// Look up a record.
    pub fn get(&self, id: AlgorithmId) -> Option<&AlgorithmRecord> {
        self.records.get(&id)
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been submitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last id assigned, or `None` before the first submission.
    pub fn last_id(&self) -> Option<AlgorithmId> {
        match self.sequence.last() {
            0 => None,
            n => Some(AlgorithmId::new(n)),
        }
    }

    /// The identity allowed to certify and revoke.
    pub fn authority(&self) -> &Identity {
        &self.authority
    }

    /// Export the counter and all records.
    pub fn snapshot(&self) -> AlgorithmRegistrySnapshot {
        AlgorithmRegistrySnapshot {
            last_id: self.sequence.last(),
            records: self.records.values().cloned().collect(),
        }
    }

    /// Rebuild a registry from a snapshot, rejecting one that breaks an
    /// invariant.
    pub fn from_snapshot(
        config: &RegistryConfig,
        clock: C,
        snapshot: AlgorithmRegistrySnapshot,
    ) -> Result<Self, SnapshotError> {
        let sequence =
            IdSequence::resume(snapshot.last_id).ok_or(SnapshotError::CounterOutOfRange {
                kind: RecordKind::Algorithm,
                last: snapshot.last_id,
                max: IdSequence::MAX_RESUMABLE,
            })?;
        let mut records = BTreeMap::new();
        for record in snapshot.records {
            let raw = record.id.get();
            if !sequence.has_allocated(raw) {
                return Err(SnapshotError::IdOutOfRange {
                    kind: RecordKind::Algorithm,
                    id: raw,
                    last: snapshot.last_id,
                });
            }
            if record.status.is_certified() != record.certification_date.is_some() {
                return Err(SnapshotError::CertificationDateMismatch {
                    id: raw,
                    status: record.status.to_string(),
                });
            }
            if records.insert(record.id, record).is_some() {
                return Err(SnapshotError::DuplicateId {
                    kind: RecordKind::Algorithm,
                    id: raw,
                });
            }
        }
        Ok(Self {
            authority: config.privileged_identity.clone(),
            sequence,
            records,
            clock,
        })
    }
}

fn not_found(id: AlgorithmId) -> RegistryError {
    RegistryError::NotFound {
        kind: RecordKind::Algorithm,
        id: id.get(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
