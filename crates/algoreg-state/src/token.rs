//! # Certified-Algorithm Tokens
//!
//! Non-fungible tokens minted by the privileged identity to mark a
//! certified algorithm. The minter is the first owner; after that the
//! right to transfer belongs to whoever currently owns the token.
//!
//! `algorithm_id` is recorded as given. This registry does not consult
//! the algorithm registry; a caller that wants to mint only for certified
//! algorithms checks [`crate::AlgorithmRegistry::get`] first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use algoreg_core::{
    AlgorithmId, AuthorityRole, IdSequence, Identity, RecordKind, RegistryConfig, RegistryError,
    SnapshotError, Timestamp, TokenId,
};

use crate::authority::{can_mint, can_transfer, require};
use crate::rejected;

/// A minted token and its current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifiedToken {
    /// Registry-assigned id.
    pub id: TokenId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The algorithm this token refers to. Not validated.
    pub algorithm_id: AlgorithmId,
    /// Certification date supplied at mint time.
    pub certification_date: Timestamp,
    /// Current owner. Changes only through transfer.
    pub owner: Identity,
}

/// Persisted form of a [`CertifiedTokenRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistrySnapshot {
    /// Last id assigned.
    pub last_id: u64,
    /// All tokens in ascending id order.
    pub tokens: Vec<CertifiedToken>,
}

/// Owns minted tokens and their ownership.
#[derive(Debug)]
pub struct CertifiedTokenRegistry {
    authority: Identity,
    sequence: IdSequence,
    tokens: BTreeMap<TokenId, CertifiedToken>,
}

impl CertifiedTokenRegistry {
    /// An empty registry.
    ///
    /// `config` is taken as already validated ([`RegistryConfig::validate`]);
    /// [`crate::Ledger`] checks it before building its registries.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            authority: config.privileged_identity.clone(),
            sequence: IdSequence::new(),
            tokens: BTreeMap::new(),
        }
    }

    /// Mint a token owned by `minter`.
    ///
    /// The authority check precedes id allocation, so a rejected mint
    /// does not advance the counter.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `minter` is not the privileged identity.
    pub fn mint(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        algorithm_id: AlgorithmId,
        certification_date: Timestamp,
        minter: &Identity,
    ) -> Result<TokenId, RegistryError> {
        require(can_mint(minter, &self.authority), minter, AuthorityRole::Privileged)
            .map_err(|e| rejected("mint", e))?;

        let id = TokenId::new(self.sequence.allocate());
        let token = CertifiedToken {
            id,
            name: name.into(),
            description: description.into(),
            algorithm_id,
            certification_date,
            owner: minter.clone(),
        };
        tracing::info!(token_id = %id, algorithm_id = %algorithm_id, owner = %minter, "token minted");
        self.tokens.insert(id, token);
        Ok(id)
    }

    /// Move a token from `sender` to `recipient`.
    ///
    /// `recipient` may be any identity, including `sender`; a self-transfer
    /// succeeds and leaves the owner as it was.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` has no token.
    /// - `Unauthorized` if `sender` is not the current owner.
    pub fn transfer(
        &mut self,
        id: TokenId,
        sender: &Identity,
        recipient: &Identity,
    ) -> Result<(), RegistryError> {
        let token = self.tokens.get_mut(&id).ok_or_else(|| {
            rejected(
                "transfer",
                RegistryError::NotFound {
                    kind: RecordKind::Token,
                    id: id.get(),
                },
            )
        })?;
        require(can_transfer(sender, token), sender, AuthorityRole::Owner)
            .map_err(|e| rejected("transfer", e))?;

        token.owner = recipient.clone();
        tracing::info!(token_id = %id, from = %sender, to = %recipient, "token transferred");
        Ok(())
    }

    /// Look up a token.
    pub fn get(&self, id: TokenId) -> Option<&CertifiedToken> {
        self.tokens.get(&id)
    }

    /// Current owner of a token.
    pub fn owner_of(&self, id: TokenId) -> Option<&Identity> {
        self.tokens.get(&id).map(|t| &t.owner)
    }

    /// Tokens currently owned by `owner`, in ascending id order.
    pub fn tokens_owned_by<'a>(
        &'a self,
        owner: &'a Identity,
    ) -> impl Iterator<Item = &'a CertifiedToken> + 'a {
        self.tokens.values().filter(move |t| t.owner == *owner)
    }

    /// Tokens in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &CertifiedToken> {
        self.tokens.values()
    }

    /// Number of minted tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether nothing has been minted.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The last id assigned, or `None` before the first mint.
    pub fn last_id(&self) -> Option<TokenId> {
        match self.sequence.last() {
            0 => None,
            n => Some(TokenId::new(n)),
        }
    }

    /// The identity allowed to mint.
    pub fn authority(&self) -> &Identity {
        &self.authority
    }

    /// Export the counter and all tokens.
    pub fn snapshot(&self) -> TokenRegistrySnapshot {
        TokenRegistrySnapshot {
            last_id: self.sequence.last(),
            tokens: self.tokens.values().cloned().collect(),
        }
    }

    /// Rebuild a registry from a snapshot.
    pub fn from_snapshot(
        config: &RegistryConfig,
        snapshot: TokenRegistrySnapshot,
    ) -> Result<Self, SnapshotError> {
        let sequence =
            IdSequence::resume(snapshot.last_id).ok_or(SnapshotError::CounterOutOfRange {
                kind: RecordKind::Token,
                last: snapshot.last_id,
                max: IdSequence::MAX_RESUMABLE,
            })?;
        let mut tokens = BTreeMap::new();
        for token in snapshot.tokens {
            let raw = token.id.get();
            if !sequence.has_allocated(raw) {
                return Err(SnapshotError::IdOutOfRange {
                    kind: RecordKind::Token,
                    id: raw,
                    last: snapshot.last_id,
                });
            }
            if tokens.insert(token.id, token).is_some() {
                return Err(SnapshotError::DuplicateId {
                    kind: RecordKind::Token,
                    id: raw,
                });
            }
        }
        Ok(Self {
            authority: config.privileged_identity.clone(),
            sequence,
            tokens,
        })
    }
}
