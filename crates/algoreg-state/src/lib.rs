//! # algoreg-state: Authorization-Gated Registries
//!
//! Three independent registries, each an owned aggregate of an id
//! sequence and an `id → record` table:
//!
//! - **Algorithms** (`algorithm.rs`): `Pending → Certified ⇄ Revoked`.
//!   Certify and revoke are reserved to the privileged identity.
//!
//! - **Tokens** (`token.rs`): non-fungible tokens minted from certified
//!   algorithms. Mint is privileged; transfer follows current ownership.
//!
//! - **Projects** (`project.rs`): research projects with a capped,
//!   ordered collaborator list and one contribution per member.
//!   Membership grows only through the lead researcher; contributions
//!   come only from members.
//!
//! The registries share no data. A token's `algorithm_id` is an opaque
//! attribute, never looked up. Sequencing operations across registries
//! is the caller's job; [`Ledger`] merely owns one of each.
//!
//! ## Transition discipline
//!
//! Every mutating operation checks existence, then authority, then any
//! capacity bound, and only then writes. A rejected call leaves the
//! registry byte-for-byte unchanged. The authority predicates live in
//! [`authority`] as plain functions over the caller and the stored record.

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod authority;
pub mod ledger;
pub mod project;
pub mod token;

// ─── Algorithm re-exports ───────────────────────────────────────────

pub use algorithm::{AlgorithmRecord, AlgorithmRegistry, AlgorithmRegistrySnapshot, AlgorithmStatus};

// ─── Token re-exports ───────────────────────────────────────────────

pub use token::{CertifiedToken, CertifiedTokenRegistry, TokenRegistrySnapshot};

// ─── Project re-exports ─────────────────────────────────────────────

pub use project::{
    Contribution, ContributionWrite, MembershipChange, ProjectRegistrySnapshot, ProjectStatus,
    ResearchProject, ResearchProjectRegistry,
};

// ─── Ledger re-exports ──────────────────────────────────────────────

pub use ledger::{Ledger, LedgerSnapshot};

use algoreg_core::RegistryError;

/// Log a rejected transition and hand the error back.
pub(crate) fn rejected(operation: &'static str, err: RegistryError) -> RegistryError {
    tracing::debug!(operation, error = %err, "transition rejected");
    err
}
