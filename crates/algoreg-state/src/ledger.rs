//! # Ledger
//!
//! Owns one algorithm registry, one token registry and one project
//! registry built from a single [`RegistryConfig`] and a single clock.
//! The registries stay independent: the ledger forwards nothing between
//! them and adds no cross-registry checks.
//!
//! Every constructor validates the configuration first, so a ledger never
//! runs under a cap of zero or an empty privileged identity.
//!
//! A [`LedgerSnapshot`] is the whole persisted state. Its digest lets two
//! parties confirm they hold the same ledger without exchanging it.

use serde::{Deserialize, Serialize};

use algoreg_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, Clock, ConfigError, ContentDigest,
    LedgerError, RegistryConfig, SnapshotError, SystemClock,
};

use crate::algorithm::{AlgorithmRegistry, AlgorithmRegistrySnapshot};
use crate::project::{ProjectRegistrySnapshot, ResearchProjectRegistry};
use crate::token::{CertifiedTokenRegistry, TokenRegistrySnapshot};

/// The persisted state of every registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Algorithm table and counter.
    pub algorithms: AlgorithmRegistrySnapshot,
    /// Token table and counter.
    pub tokens: TokenRegistrySnapshot,
    /// Project table, contribution table and counter.
    pub projects: ProjectRegistrySnapshot,
}

impl LedgerSnapshot {
    /// SHA-256 over the JCS canonical form of the snapshot.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(sha256_digest(&canonical))
    }
}

/// One instance of each registry sharing a configuration and a clock.
#[derive(Debug)]
pub struct Ledger<C = SystemClock> {
    config: RegistryConfig,
    algorithms: AlgorithmRegistry<C>,
    tokens: CertifiedTokenRegistry,
    projects: ResearchProjectRegistry<C>,
}

impl Ledger<SystemClock> {
    /// An empty ledger on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> Ledger<C> {
    /// An empty ledger reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn with_clock(config: RegistryConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let algorithms = AlgorithmRegistry::with_clock(&config, clock.clone());
        let tokens = CertifiedTokenRegistry::new(&config);
        let projects = ResearchProjectRegistry::with_clock(&config, clock);
        Ok(Self {
            config,
            algorithms,
            tokens,
            projects,
        })
    }

    /// Rebuild a ledger from a snapshot, validating the configuration and
    /// every registry.
    pub fn restore(
        config: RegistryConfig,
        clock: C,
        snapshot: LedgerSnapshot,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        let (algorithms, tokens, projects) =
            Self::restore_parts(&config, clock, snapshot).map_err(|e| {
                tracing::warn!(error = %e, "ledger snapshot rejected");
                e
            })?;
        tracing::info!(
            algorithms = algorithms.len(),
            tokens = tokens.len(),
            projects = projects.len(),
            "ledger restored"
        );
        Ok(Self {
            config,
            algorithms,
            tokens,
            projects,
        })
    }

    #[allow(clippy::type_complexity)]
    fn restore_parts(
        config: &RegistryConfig,
        clock: C,
        snapshot: LedgerSnapshot,
    ) -> Result<
        (
            AlgorithmRegistry<C>,
            CertifiedTokenRegistry,
            ResearchProjectRegistry<C>,
        ),
        SnapshotError,
    > {
        let algorithms = AlgorithmRegistry::from_snapshot(config, clock.clone(), snapshot.algorithms)?;
        let tokens = CertifiedTokenRegistry::from_snapshot(config, snapshot.tokens)?;
        let projects = ResearchProjectRegistry::from_snapshot(config, clock, snapshot.projects)?;
        Ok((algorithms, tokens, projects))
    }

    /// Export every registry.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            algorithms: self.algorithms.snapshot(),
            tokens: self.tokens.snapshot(),
            projects: self.projects.snapshot(),
        }
    }

    /// The configuration the registries were built from.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The algorithm registry.
    pub fn algorithms(&self) -> &AlgorithmRegistry<C> {
        &self.algorithms
    }

    /// The algorithm registry, for transitions.
    pub fn algorithms_mut(&mut self) -> &mut AlgorithmRegistry<C> {
        &mut self.algorithms
    }

    /// The token registry.
    pub fn tokens(&self) -> &CertifiedTokenRegistry {
        &self.tokens
    }

    /// The token registry, for transitions.
    pub fn tokens_mut(&mut self) -> &mut CertifiedTokenRegistry {
        &mut self.tokens
    }

    /// The project registry.
    pub fn projects(&self) -> &ResearchProjectRegistry<C> {
        &self.projects
    }

    /// The project registry, for transitions.
    pub fn projects_mut(&mut self) -> &mut ResearchProjectRegistry<C> {
        &mut self.projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoreg_core::{Identity, ManualClock, Timestamp};
    use std::sync::Arc;

    fn who(s: &str) -> Identity {
        Identity::from(s)
    }

    fn ledger() -> Ledger<Arc<ManualClock>> {
        let clock = Arc::new(ManualClock::new(Timestamp::parse("2026-05-05T05:05:05Z").unwrap()));
        Ledger::with_clock(RegistryConfig::default(), clock).unwrap()
    }

    fn populate(ledger: &mut Ledger<Arc<ManualClock>>) {
        let owner = who("CONTRACT_OWNER");
        let alg = ledger.algorithms_mut().submit("Dilithium", "signatures", "impl", &who("alice"));
        ledger.algorithms_mut().certify(alg, &owner).unwrap();
        let date = ledger.algorithms().get(alg).unwrap().certification_date.unwrap();
        let tok = ledger.tokens_mut().mint("Dilithium", "cert", alg, date, &owner).unwrap();
        ledger.tokens_mut().transfer(tok, &owner, &who("bob")).unwrap();
        let p = ledger.projects_mut().create_project("PQ audit", "review", &who("carol"));
        ledger.projects_mut().add_collaborator(p, &who("dave"), &who("carol")).unwrap();
        ledger.projects_mut().add_contribution(p, "fuzzing results", &who("dave")).unwrap();
    }

    #[test]
    fn test_registries_share_config() {
        let config = RegistryConfig::with_privileged_identity("registrar");
        let ledger = Ledger::new(config).unwrap();
        assert_eq!(ledger.algorithms().authority(), &who("registrar"));
        assert_eq!(ledger.tokens().authority(), &who("registrar"));
        assert_eq!(ledger.config().privileged_identity, "registrar");
    }

    #[test]
    fn test_id_spaces_are_independent() {
        let mut ledger = ledger();
        let a = ledger.algorithms_mut().submit("a", "", "", &who("x"));
        let p = ledger.projects_mut().create_project("p", "", &who("x"));
        assert_eq!(a.get(), 1);
        assert_eq!(p.get(), 1);
    }

    #[test]
    fn test_snapshot_restore_same_digest() {
        let mut original = ledger();
        populate(&mut original);
        let snap = original.snapshot();
        let digest = snap.digest().unwrap();

        let json = serde_json::to_string(&snap).unwrap();
        let parsed: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let restored = Ledger::restore(RegistryConfig::default(), clock, parsed).unwrap();

        assert_eq!(restored.snapshot().digest().unwrap(), digest);
        assert_eq!(restored.tokens().len(), 1);
        assert_eq!(restored.projects().contribution_count(), 1);
    }

    #[test]
    fn test_digest_changes_with_state() {
        let mut ledger = ledger();
        populate(&mut ledger);
        let before = ledger.snapshot().digest().unwrap();
        ledger.algorithms_mut().submit("another", "", "", &who("eve"));
        let after = ledger.snapshot().digest().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_restore_rejects_invalid_part() {
        let mut ledger = ledger();
        populate(&mut ledger);
        let mut snap = ledger.snapshot();
        snap.tokens.last_id = 0;
        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let err = Ledger::restore(RegistryConfig::default(), clock, snap).unwrap_err();
        assert!(matches!(err, LedgerError::Snapshot(SnapshotError::IdOutOfRange { .. })));
    }

    #[test]
    fn test_restore_rejects_saturated_counter() {
        let mut ledger = ledger();
        populate(&mut ledger);
        let mut snap = ledger.snapshot();
        snap.projects.last_id = u64::MAX;
        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let err = Ledger::restore(RegistryConfig::default(), clock, snap).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Snapshot(SnapshotError::CounterOutOfRange { last: u64::MAX, .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_cap = RegistryConfig {
            max_collaborators: 0,
            ..RegistryConfig::default()
        };
        let err = Ledger::new(zero_cap).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_collaborators", .. }));

        let anonymous = RegistryConfig::with_privileged_identity("");
        assert!(Ledger::new(anonymous).is_err());
    }

    #[test]
    fn test_restore_rejects_invalid_config() {
        let snap = ledger().snapshot();
        let zero_cap = RegistryConfig {
            max_collaborators: 0,
            ..RegistryConfig::default()
        };
        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let err = Ledger::restore(zero_cap, clock, snap).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Config(ConfigError::Invalid { field: "max_collaborators", .. })
        ));
    }
}
