//! # Authority Predicates
//!
//! One pure predicate per gated operation. Each takes the caller and the
//! stored value the decision depends on and returns `bool`; nothing here
//! reads or writes registry state.
//!
//! | Operation          | Authority                         |
//! |--------------------|-----------------------------------|
//! | certify, revoke    | the fixed privileged identity     |
//! | mint               | the fixed privileged identity     |
//! | transfer           | the token's current owner         |
//! | add collaborator   | the project's lead researcher     |
//! | add contribution   | any current collaborator          |

use algoreg_core::{AuthorityRole, Identity, RegistryError};

use crate::project::ResearchProject;
use crate::token::CertifiedToken;

/// Whether `caller` may certify an algorithm.
pub fn can_certify(caller: &Identity, privileged: &Identity) -> bool {
    caller == privileged
}

/// Whether `caller` may revoke an algorithm's certification.
pub fn can_revoke(caller: &Identity, privileged: &Identity) -> bool {
    caller == privileged
}

/// Whether `caller` may mint a token.
pub fn can_mint(caller: &Identity, privileged: &Identity) -> bool {
    caller == privileged
}

/// Whether `caller` may transfer `token`.
///
/// Ownership is the capability; the original minter keeps no rights
/// once the token has moved.
pub fn can_transfer(caller: &Identity, token: &CertifiedToken) -> bool {
    *caller == token.owner
}

/// Whether `caller` may add collaborators to `project`.
pub fn can_add_collaborator(caller: &Identity, project: &ResearchProject) -> bool {
    *caller == project.lead_researcher
}

/// Whether `caller` may record a contribution on `project`.
pub fn can_contribute(caller: &Identity, project: &ResearchProject) -> bool {
    project.collaborators.contains(caller)
}

/// Turn a predicate result into a transition guard.
pub fn require(granted: bool, caller: &Identity, role: AuthorityRole) -> Result<(), RegistryError> {
    if granted {
        Ok(())
    } else {
        Err(RegistryError::unauthorized(caller, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoreg_core::{AlgorithmId, ProjectId, Timestamp, TokenId};

    use crate::project::ProjectStatus;

    fn id(s: &str) -> Identity {
        Identity::from(s)
    }

    fn token(owner: &str) -> CertifiedToken {
        CertifiedToken {
            id: TokenId::new(1),
            name: "Kyber".to_string(),
            description: "lattice KEM".to_string(),
            algorithm_id: AlgorithmId::new(1),
            certification_date: Timestamp::now(),
            owner: id(owner),
        }
    }

    fn project(lead: &str, members: &[&str]) -> ResearchProject {
        let mut collaborators = vec![id(lead)];
        collaborators.extend(members.iter().map(|m| id(m)));
        ResearchProject {
            id: ProjectId::new(1),
            title: "t".to_string(),
            description: "d".to_string(),
            lead_researcher: id(lead),
            collaborators,
            status: ProjectStatus::Active,
        }
    }

    #[test]
    fn test_privileged_predicates_match_only_exact_identity() {
        let owner = id("CONTRACT_OWNER");
        assert!(can_certify(&owner, &owner));
        assert!(can_revoke(&owner, &owner));
        assert!(can_mint(&owner, &owner));
        for other in ["contract_owner", "CONTRACT_OWNER ", "", "user1"] {
            assert!(!can_certify(&id(other), &owner));
            assert!(!can_revoke(&id(other), &owner));
            assert!(!can_mint(&id(other), &owner));
        }
    }

    #[test]
    fn test_transfer_follows_current_owner() {
        let t = token("alice");
        assert!(can_transfer(&id("alice"), &t));
        assert!(!can_transfer(&id("bob"), &t));
    }

    #[test]
    fn test_only_lead_adds_collaborators() {
        let p = project("lead", &["member"]);
        assert!(can_add_collaborator(&id("lead"), &p));
        assert!(!can_add_collaborator(&id("member"), &p));
        assert!(!can_add_collaborator(&id("stranger"), &p));
    }

    #[test]
    fn test_any_member_contributes() {
        let p = project("lead", &["member"]);
        assert!(can_contribute(&id("lead"), &p));
        assert!(can_contribute(&id("member"), &p));
        assert!(!can_contribute(&id("stranger"), &p));
    }

    #[test]
    fn test_require_maps_denial_to_unauthorized() {
        assert!(require(true, &id("x"), AuthorityRole::Owner).is_ok());
        let err = require(false, &id("x"), AuthorityRole::Owner).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Unauthorized {
                caller: id("x"),
                required: AuthorityRole::Owner,
            }
        );
    }
}
