//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Account (user) identifier
pub type UserId = i64;

/// Organisation identifier
pub type OrgId = i64;

/// Project identifier
pub type ProjectId = i64;

/// Action names understood by the entity policies
pub mod actions {
    pub const READ: &str = "read";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const APPROVE: &str = "approve";
    pub const UPLOAD_FILES: &str = "uploadFiles";
    pub const DELETE_FILES: &str = "deleteFiles";
    pub const DELETE_BULK: &str = "deleteBulk";
}

/// Permission tokens interpreted by the entity policies
pub mod tokens {
    /// Prefix of framework-admin tokens, e.g. `framework-ppc`
    pub const FRAMEWORK_PREFIX: &str = "framework-";
    pub const MANAGE_OWN: &str = "manage-own";
    pub const PROJECTS_MANAGE: &str = "projects-manage";
    pub const PROJECTS_READ: &str = "projects-read";
    pub const VIEW_DASHBOARD: &str = "view-dashboard";
    pub const USERS_MANAGE: &str = "users-manage";
    pub const MEDIA_MANAGE: &str = "media-manage";
}

/// Request-scoped actor information passed explicitly into every check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Authenticated user, `None` when the request carried no credentials
    pub user_id: Option<UserId>,
}

impl ActorContext {
    /// Context for an authenticated user
    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Context for a request without a resolved actor
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// The current actor id, if any
    pub fn current_actor_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Flat set of permission tokens held by a user
///
/// Order is irrelevant and duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    /// Create an empty token set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the token is held
    pub fn has(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Add a token, returning `false` if it was already present
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    /// Framework keys granted through `framework-<key>` tokens
    pub fn framework_keys(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .filter_map(|token| token.strip_prefix(tokens::FRAMEWORK_PREFIX))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Which project-membership flags a lookup should match
///
/// When both flags are requested a row matches if it carries either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectRoles {
    pub monitoring: bool,
    pub managing: bool,
}

impl ProjectRoles {
    pub const MONITORING: Self = Self {
        monitoring: true,
        managing: false,
    };

    pub const MANAGING: Self = Self {
        monitoring: false,
        managing: true,
    };

    pub const ANY: Self = Self {
        monitoring: true,
        managing: true,
    };

    /// Whether a membership row with the given flags satisfies this filter
    pub fn matches(&self, is_monitoring: bool, is_managing: bool) -> bool {
        (self.monitoring && is_monitoring) || (self.managing && is_managing)
    }
}

/// Membership sets resolved for one actor during one authorization call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSnapshot {
    /// Directly owned organisation plus approved memberships
    pub organisation_ids: BTreeSet<OrgId>,

    /// Projects where the actor's membership row has `is_managing`
    pub managing_project_ids: BTreeSet<ProjectId>,

    /// Projects where the actor's membership row has `is_monitoring`
    pub monitoring_project_ids: BTreeSet<ProjectId>,
}
