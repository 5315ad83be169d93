//! # algoreg-core: Foundational Types for the Algorithm Registry
//!
//! This crate holds the primitives shared by every registry in the
//! workspace. It depends on nothing internal; `algoreg-state` builds the
//! state machines on top of it.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `AlgorithmId`, `TokenId` and
//!    `ProjectId` are distinct types over `u64`. An algorithm id cannot be
//!    handed to the token registry by accident.
//!
//! 2. **Opaque caller identities.** `Identity` wraps the authenticated
//!    caller string supplied by the environment. It is compared
//!    byte-for-byte and never parsed.
//!
//! 3. **One counter per registry.** `IdSequence` increments before it
//!    assigns, starts at 1, and is never rewound.
//!
//! 4. **Injected time.** Registries read time through the [`Clock`] trait so
//!    tests and replays can pin timestamps.
//!
//! 5. **Uniform error taxonomy.** Every rejected transition is a
//!    [`RegistryError`]: `NotFound`, `Unauthorized` or `CapacityExceeded`.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![forbid(unsafe_code)]

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod sequence;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use config::{RegistryConfig, DEFAULT_MAX_COLLABORATORS, DEFAULT_PRIVILEGED_IDENTITY};
pub use digest::{sha256_digest, ContentDigest};
pub use error::{
    AuthorityRole, CanonicalizationError, ConfigError, LedgerError, RecordKind, RegistryError,
    SnapshotError, TimestampError,
};
pub use identity::{AlgorithmId, Identity, ProjectId, TokenId};
pub use sequence::IdSequence;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
