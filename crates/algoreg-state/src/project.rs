//! # Collaborative Research Projects
//!
//! A project is created by its lead researcher, who is also its first
//! collaborator. Only the lead may admit new collaborators, up to the
//! configured cap (20 by default, lead included). Any collaborator may
//! record a contribution; each collaborator holds at most one
//! contribution per project and a later one replaces the earlier.
//!
//! Membership only grows. Projects and contributions are never deleted.
//!
//! ## Duplicate membership
//!
//! Adding someone who is already a collaborator succeeds without
//! changing anything and reports [`MembershipChange::AlreadyMember`].
//! The check runs before the capacity check, so re-adding a member of a
//! full project is not a `CapacityExceeded`. The collaborator list stays
//! a set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use algoreg_core::{
    AuthorityRole, Clock, IdSequence, Identity, ProjectId, RecordKind, RegistryConfig,
    RegistryError, SnapshotError, SystemClock, Timestamp,
};

use crate::authority::{can_add_collaborator, can_contribute, require};
use crate::rejected;

// ─── Project State ───────────────────────────────────────────────────

/// Lifecycle state of a project. Only `Active` exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Open for membership and contributions.
    #[default]
    Active,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("ACTIVE"),
        }
    }
}

/// A research project and its membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProject {
    /// Registry-assigned id.
    pub id: ProjectId,
    /// Project title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Creator; sole authority over membership.
    pub lead_researcher: Identity,
    /// Members in admission order. The lead is always first.
    pub collaborators: Vec<Identity>,
    /// Lifecycle state.
    pub status: ProjectStatus,
}

impl ResearchProject {
    /// Whether `identity` is a member.
    pub fn has_collaborator(&self, identity: &Identity) -> bool {
        self.collaborators.contains(identity)
    }
}

/// One collaborator's latest contribution to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// The project contributed to.
    pub project_id: ProjectId,
    /// Who contributed.
    pub contributor: Identity,
    /// Opaque contribution text.
    pub text: String,
    /// When this version was written.
    pub timestamp: Timestamp,
}

/// Result of a successful `add_collaborator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The identity was appended to the collaborator list.
    Added,
    /// The identity was already a member; nothing changed.
    AlreadyMember,
}

/// Result of a successful `add_contribution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionWrite {
    /// First contribution from this collaborator on this project.
    Created,
    /// An earlier contribution was replaced.
    Replaced,
}

/// Persisted form of a [`ResearchProjectRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRegistrySnapshot {
    /// Last id assigned.
    pub last_id: u64,
    /// All projects in ascending id order.
    pub projects: Vec<ResearchProject>,
    /// All contributions ordered by `(project, contributor)`.
    pub contributions: Vec<Contribution>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// Owns projects, their membership, and the contribution table.
#[derive(Debug)]
pub struct ResearchProjectRegistry<C = SystemClock> {
    max_collaborators: usize,
    sequence: IdSequence,
    projects: BTreeMap<ProjectId, ResearchProject>,
    contributions: BTreeMap<(ProjectId, Identity), Contribution>,
    clock: C,
}

impl ResearchProjectRegistry<SystemClock> {
    /// An empty registry stamping contributions with the system clock.
    pub fn new(config: &RegistryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ResearchProjectRegistry<C> {
    /// An empty registry reading time from `clock`.
    ///
    /// `config` is taken as already validated ([`RegistryConfig::validate`]);
    /// [`crate::Ledger`] checks it before building its registries.
    pub fn with_clock(config: &RegistryConfig, clock: C) -> Self {
        Self {
            max_collaborators: config.max_collaborators,
            sequence: IdSequence::new(),
            projects: BTreeMap::new(),
            contributions: BTreeMap::new(),
            clock,
        }
    }

    /// Create a project led by `creator`. Always succeeds.
    ///
    /// The lead takes one collaborator slot, so a cap of zero would leave
    /// every new project over its limit.
    pub fn create_project(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        creator: &Identity,
    ) -> ProjectId {
        let id = ProjectId::new(self.sequence.allocate());
        let project = ResearchProject {
            id,
            title: title.into(),
            description: description.into(),
            lead_researcher: creator.clone(),
            collaborators: vec![creator.clone()],
            status: ProjectStatus::Active,
        };
        tracing::info!(project_id = %id, lead = %creator, title = %project.title, "project created");
        self.projects.insert(id, project);
        id
    }

    /// Admit `new_collaborator` to a project.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist.
    /// - `Unauthorized` if `adder` is not the lead researcher.
    /// - `CapacityExceeded` if the project already has the maximum
    ///   number of collaborators and `new_collaborator` is not one of them.
    pub fn add_collaborator(
        &mut self,
        project_id: ProjectId,
        new_collaborator: &Identity,
        adder: &Identity,
    ) -> Result<MembershipChange, RegistryError> {
        let limit = self.max_collaborators;
        let project = self
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| rejected("add_collaborator", not_found(project_id)))?;
        require(
            can_add_collaborator(adder, project),
            adder,
            AuthorityRole::LeadResearcher,
        )
        .map_err(|e| rejected("add_collaborator", e))?;

        if project.has_collaborator(new_collaborator) {
            tracing::debug!(project_id = %project_id, collaborator = %new_collaborator, "already a collaborator");
            return Ok(MembershipChange::AlreadyMember);
        }
        if project.collaborators.len() >= limit {
            return Err(rejected(
                "add_collaborator",
                RegistryError::CapacityExceeded {
                    project: project_id,
                    limit,
                },
            ));
        }

        project.collaborators.push(new_collaborator.clone());
        tracing::info!(
            project_id = %project_id,
            collaborator = %new_collaborator,
            members = project.collaborators.len(),
            "collaborator added"
        );
        Ok(MembershipChange::Added)
    }

    /// Record `contributor`'s contribution, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist.
    /// - `Unauthorized` if `contributor` is not a collaborator.
    pub fn add_contribution(
        &mut self,
        project_id: ProjectId,
        text: impl Into<String>,
        contributor: &Identity,
    ) -> Result<ContributionWrite, RegistryError> {
        let project = self
            .projects
            .get(&project_id)
            .ok_or_else(|| rejected("add_contribution", not_found(project_id)))?;
        require(
            can_contribute(contributor, project),
            contributor,
            AuthorityRole::Collaborator,
        )
        .map_err(|e| rejected("add_contribution", e))?;

        let contribution = Contribution {
            project_id,
            contributor: contributor.clone(),
            text: text.into(),
            timestamp: self.clock.now(),
        };
        let write = match self
            .contributions
            .insert((project_id, contributor.clone()), contribution)
        {
            Some(_) => ContributionWrite::Replaced,
            None => ContributionWrite::Created,
        };
        tracing::info!(project_id = %project_id, contributor = %contributor, write = ?write, "contribution recorded");
        Ok(write)
    }

    /// Look up a project.
    pub fn get(&self, id: ProjectId) -> Option<&ResearchProject> {
        self.projects.get(&id)
    }

    /// Whether `identity` is a member of project `id`. False for unknown projects.
    pub fn is_collaborator(&self, id: ProjectId, identity: &Identity) -> bool {
        self.projects
            .get(&id)
            .is_some_and(|p| p.has_collaborator(identity))
    }

    /// The stored contribution of `contributor` on project `id`.
    pub fn contribution(&self, id: ProjectId, contributor: &Identity) -> Option<&Contribution> {
        self.contributions.get(&(id, contributor.clone()))
    }

    /// All contributions on project `id`, ordered by contributor.
    pub fn contributions_for(&self, id: ProjectId) -> impl Iterator<Item = &Contribution> {
        self.contributions
            .range((id, Identity::default())..)
            .take_while(move |((project, _), _)| *project == id)
            .map(|(_, c)| c)
    }

    /// Total stored contributions across all projects.
    pub fn contribution_count(&self) -> usize {
        self.contributions.len()
    }

    /// Projects in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResearchProject> {
        self.projects.values()
    }

    /// Number of projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether no project has been created.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// The last id assigned, or `None` before the first project.
    pub fn last_id(&self) -> Option<ProjectId> {
        match self.sequence.last() {
            0 => None,
            n => Some(ProjectId::new(n)),
        }
    }

    /// The collaborator cap in force.
    pub fn max_collaborators(&self) -> usize {
        self.max_collaborators
    }

    /// Export the counter, all projects and all contributions.
    pub fn snapshot(&self) -> ProjectRegistrySnapshot {
        ProjectRegistrySnapshot {
            last_id: self.sequence.last(),
            projects: self.projects.values().cloned().collect(),
            contributions: self.contributions.values().cloned().collect(),
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// Rejects snapshots whose projects break the membership invariants
    /// or whose contributions point at a missing project or a non-member.
    pub fn from_snapshot(
        config: &RegistryConfig,
        clock: C,
        snapshot: ProjectRegistrySnapshot,
    ) -> Result<Self, SnapshotError> {
        let limit = config.max_collaborators;
        let sequence =
            IdSequence::resume(snapshot.last_id).ok_or(SnapshotError::CounterOutOfRange {
                kind: RecordKind::Project,
                last: snapshot.last_id,
                max: IdSequence::MAX_RESUMABLE,
            })?;

        let mut projects = BTreeMap::new();
        for project in snapshot.projects {
            let raw = project.id.get();
            if !sequence.has_allocated(raw) {
                return Err(SnapshotError::IdOutOfRange {
                    kind: RecordKind::Project,
                    id: raw,
                    last: snapshot.last_id,
                });
            }
            check_membership(&project, limit)?;
            if projects.insert(project.id, project).is_some() {
                return Err(SnapshotError::DuplicateId {
                    kind: RecordKind::Project,
                    id: raw,
                });
            }
        }

        let mut contributions = BTreeMap::new();
        for contribution in snapshot.contributions {
            let project_id = contribution.project_id;
            let contributor = contribution.contributor.clone();
            let project = projects.get(&project_id).ok_or_else(|| SnapshotError::OrphanContribution {
                project: project_id,
                contributor: contributor.clone(),
            })?;
            if !project.has_collaborator(&contributor) {
                return Err(SnapshotError::NonMemberContribution {
                    project: project_id,
                    contributor,
                });
            }
            if contributions
                .insert((project_id, contributor.clone()), contribution)
                .is_some()
            {
                return Err(SnapshotError::DuplicateContribution {
                    project: project_id,
                    contributor,
                });
            }
        }

        Ok(Self {
            max_collaborators: limit,
            sequence,
            projects,
            contributions,
            clock,
        })
    }
}

fn not_found(id: ProjectId) -> RegistryError {
    RegistryError::NotFound {
        kind: RecordKind::Project,
        id: id.get(),
    }
}

/// Lead first, no repeats, within the cap.
fn check_membership(project: &ResearchProject, limit: usize) -> Result<(), SnapshotError> {
    if project.collaborators.first() != Some(&project.lead_researcher) {
        return Err(SnapshotError::LeadNotFirst {
            project: project.id,
        });
    }
    if project.collaborators.len() > limit {
        return Err(SnapshotError::TooManyCollaborators {
            project: project.id,
            count: project.collaborators.len(),
            limit,
        });
    }
    let mut seen = BTreeSet::new();
    for member in &project.collaborators {
        if !seen.insert(member) {
            return Err(SnapshotError::DuplicateCollaborator {
                project: project.id,
                collaborator: member.clone(),
            });
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
