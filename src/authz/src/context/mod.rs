//! Read-side sources of authorization context
//!
//! The engine consumes two collaborators: a permission token source and a
//! membership resolver. Both are read-only and must report "nothing granted"
//! as an empty set rather than an error.

use crate::error::Result;
use crate::types::{OrgId, ProjectId, ProjectRoles, TokenSet, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDirectory;

/// Permission token source
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Tokens currently granted to the user (empty for unknown users)
    async fn tokens(&self, user_id: UserId) -> Result<TokenSet>;
}

/// Membership resolver
#[async_trait]
pub trait MembershipResolver: Send + Sync {
    /// Directly owned organisation plus organisations with an approved membership
    async fn organisation_ids(&self, user_id: UserId) -> Result<BTreeSet<OrgId>>;

    /// Projects where the user's membership row carries any requested flag
    async fn project_ids(&self, user_id: UserId, roles: ProjectRoles) -> Result<BTreeSet<ProjectId>>;
}

/// Organisation membership status; only `Approved` confers authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Requested,
    Approved,
    Rejected,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Requested => "requested",
            MembershipStatus::Approved => "approved",
            MembershipStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrganisationMembership {
    organisation_id: OrgId,
    status: MembershipStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectMembership {
    project_id: ProjectId,
    is_monitoring: bool,
    is_managing: bool,
}

#[derive(Debug, Default)]
struct DirectoryData {
    tokens: HashMap<UserId, TokenSet>,
    owned_organisations: HashMap<UserId, OrgId>,
    organisation_memberships: HashMap<UserId, Vec<OrganisationMembership>>,
    project_memberships: HashMap<UserId, Vec<ProjectMembership>>,
}

/// In-memory account directory implementing both context sources
///
/// Mirrors the account system's tables closely enough for hosts that keep
/// membership in process, and for tests.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    data: Arc<RwLock<DirectoryData>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a permission token to a user
    pub async fn grant(&self, user_id: UserId, token: impl Into<String>) {
        let mut data = self.data.write().await;
        data.tokens.entry(user_id).or_default().insert(token);
    }

    /// Revoke every token held by a user
    pub async fn revoke_all(&self, user_id: UserId) {
        let mut data = self.data.write().await;
        data.tokens.remove(&user_id);
    }

    /// Set the organisation a user owns directly (`users.organisation_id`)
    pub async fn set_owned_organisation(&self, user_id: UserId, organisation_id: Option<OrgId>) {
        let mut data = self.data.write().await;
        match organisation_id {
            Some(id) => {
                data.owned_organisations.insert(user_id, id);
            }
            None => {
                data.owned_organisations.remove(&user_id);
            }
        }
    }

    /// Record or update an organisation membership row
    pub async fn set_organisation_membership(
        &self,
        user_id: UserId,
        organisation_id: OrgId,
        status: MembershipStatus,
    ) {
        let mut data = self.data.write().await;
        let rows = data.organisation_memberships.entry(user_id).or_default();
        match rows.iter_mut().find(|row| row.organisation_id == organisation_id) {
            Some(row) => row.status = status,
            None => rows.push(OrganisationMembership {
                organisation_id,
                status,
            }),
        }
    }

    /// Record or update a project membership row
    pub async fn set_project_membership(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        is_monitoring: bool,
        is_managing: bool,
    ) {
        let mut data = self.data.write().await;
        let rows = data.project_memberships.entry(user_id).or_default();
        match rows.iter_mut().find(|row| row.project_id == project_id) {
            Some(row) => {
                row.is_monitoring = is_monitoring;
                row.is_managing = is_managing;
            }
            None => rows.push(ProjectMembership {
                project_id,
                is_monitoring,
                is_managing,
            }),
        }
    }

    /// Remove a project membership row
    pub async fn remove_project_membership(&self, user_id: UserId, project_id: ProjectId) {
        let mut data = self.data.write().await;
        if let Some(rows) = data.project_memberships.get_mut(&user_id) {
            rows.retain(|row| row.project_id != project_id);
        }
    }
}

#[async_trait]
impl PermissionSource for InMemoryDirectory {
    async fn tokens(&self, user_id: UserId) -> Result<TokenSet> {
        let data = self.data.read().await;
        Ok(data.tokens.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MembershipResolver for InMemoryDirectory {
    async fn organisation_ids(&self, user_id: UserId) -> Result<BTreeSet<OrgId>> {
        let data = self.data.read().await;
        let mut ids: BTreeSet<OrgId> = data
            .owned_organisations
            .get(&user_id)
            .copied()
            .into_iter()
            .collect();

        if let Some(rows) = data.organisation_memberships.get(&user_id) {
            ids.extend(
                rows.iter()
                    .filter(|row| row.status == MembershipStatus::Approved)
                    .map(|row| row.organisation_id),
            );
        }

        Ok(ids)
    }

    async fn project_ids(&self, user_id: UserId, roles: ProjectRoles) -> Result<BTreeSet<ProjectId>> {
        let data = self.data.read().await;
        let ids: BTreeSet<ProjectId> = data
            .project_memberships
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|row| roles.matches(row.is_monitoring, row.is_managing))
                    .map(|row| row.project_id)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_has_empty_context() {
        let directory = InMemoryDirectory::new();

        assert!(directory.tokens(404).await.unwrap().is_empty());
        assert!(directory.organisation_ids(404).await.unwrap().is_empty());
        assert!(directory.project_ids(404, ProjectRoles::ANY).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_approved_memberships_count() {
        let directory = InMemoryDirectory::new();
        directory.set_owned_organisation(7, Some(42)).await;
        directory.set_organisation_membership(7, 1, MembershipStatus::Approved).await;
        directory.set_organisation_membership(7, 2, MembershipStatus::Requested).await;
        directory.set_organisation_membership(7, 3, MembershipStatus::Rejected).await;

        let ids = directory.organisation_ids(7).await.unwrap();
        assert_eq!(ids, BTreeSet::from([1, 42]));

        directory.set_organisation_membership(7, 2, MembershipStatus::Approved).await;
        let ids = directory.organisation_ids(7).await.unwrap();
        assert_eq!(ids, BTreeSet::from([1, 2, 42]));
    }

    #[tokio::test]
    async fn test_project_role_filters() {
        let directory = InMemoryDirectory::new();
        directory.set_project_membership(9, 5, false, true).await;
        directory.set_project_membership(9, 6, true, false).await;
        directory.set_project_membership(9, 7, true, true).await;
        directory.set_project_membership(9, 8, false, false).await;

        let managing = directory.project_ids(9, ProjectRoles::MANAGING).await.unwrap();
        assert_eq!(managing, BTreeSet::from([5, 7]));

        let monitoring = directory.project_ids(9, ProjectRoles::MONITORING).await.unwrap();
        assert_eq!(monitoring, BTreeSet::from([6, 7]));

        let any = directory.project_ids(9, ProjectRoles::ANY).await.unwrap();
        assert_eq!(any, BTreeSet::from([5, 6, 7]));
    }

    #[tokio::test]
    async fn test_grant_and_revoke_tokens() {
        let directory = InMemoryDirectory::new();
        directory.grant(1, "framework-ppc").await;
        directory.grant(1, "framework-ppc").await;
        directory.grant(1, "manage-own").await;

        assert_eq!(directory.tokens(1).await.unwrap().len(), 2);

        directory.revoke_all(1).await;
        assert!(directory.tokens(1).await.unwrap().is_empty());
    }
}
