//! # Identity and Identifier Newtypes
//!
//! `Identity` is the authenticated caller string supplied by the
//! environment with every mutating call. The registries never verify it;
//! authentication happens upstream.
//!
//! `AlgorithmId`, `TokenId` and `ProjectId` keep the three id spaces apart.
//! Each registry allocates its own ids from an [`crate::IdSequence`], so the
//! same integer may legitimately name an algorithm, a token and a project
//! at once.

use serde::{Deserialize, Serialize};

/// An opaque, already-authenticated caller identity.
///
/// Compared byte-for-byte. No normalization, no format checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a caller identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identity string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw integer value.
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an algorithm submission.
    AlgorithmId,
    "algorithm"
);

record_id!(
    /// Identifier of a certified-algorithm token.
    TokenId,
    "token"
);

record_id!(
    /// Identifier of a research project.
    ProjectId,
    "project"
);
