//! Entity policies
//!
//! One module per resource type. Each exposes a `rules` function turning the
//! actor's tokens and memberships into the rule list for that type. Policies
//! never touch the database; everything they need arrives in
//! [`PolicyContext`].
//!
//! Token vocabulary:
//!
//! - `framework-<key>`: admin of one framework, scoped by `frameworkKey`
//! - `manage-own`: full rights on resources owned by the actor's organisations
//! - `projects-manage`: full rights on projects the actor manages
//! - `projects-read`, `view-dashboard`: unconditional read
//! - `users-manage`, `media-manage`: user administration, media bulk delete

pub mod application;
pub mod disturbance;
pub mod form_submission;
pub mod funding_programme;
pub mod media;
pub mod nursery;
pub mod nursery_report;
pub mod organisation;
pub mod project;
pub mod project_pitch;
pub mod project_polygon;
pub mod project_report;
pub mod site;
pub mod site_report;
pub mod task;
pub mod tracking;
pub mod user;

use std::collections::BTreeSet;

use crate::rule::{Condition, Rule};
use crate::subject::{Attr, SubjectType};
use crate::types::actions::READ;
use crate::types::{tokens, MembershipSnapshot, OrgId, ProjectId, TokenSet, UserId};

/// Signature shared by every entity policy
pub type PolicyFn = fn(&PolicyContext<'_>) -> Vec<Rule>;

/// Everything a policy may consult while building rules
pub struct PolicyContext<'a> {
    user_id: UserId,
    tokens: &'a TokenSet,
    membership: &'a MembershipSnapshot,
    framework_keys: BTreeSet<String>,
}

impl<'a> PolicyContext<'a> {
    pub fn new(user_id: UserId, tokens: &'a TokenSet, membership: &'a MembershipSnapshot) -> Self {
        Self {
            user_id,
            tokens,
            membership,
            framework_keys: tokens.framework_keys(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn has(&self, token: &str) -> bool {
        self.tokens.has(token)
    }

    /// Keys from the actor's `framework-<key>` tokens
    pub fn frameworks(&self) -> &BTreeSet<String> {
        &self.framework_keys
    }

    pub fn organisations(&self) -> &BTreeSet<OrgId> {
        &self.membership.organisation_ids
    }

    pub fn managing_projects(&self) -> &BTreeSet<ProjectId> {
        &self.membership.managing_project_ids
    }

    pub fn monitoring_projects(&self) -> &BTreeSet<ProjectId> {
        &self.membership.monitoring_project_ids
    }

    /// One rule per framework key, each restricted to `frameworkKey == key`
    pub fn framework_rules(&self, actions: &[&'static str], subject: SubjectType) -> Vec<Rule> {
        self.framework_keys
            .iter()
            .map(|key| Rule::new(actions, subject).when(Condition::eq(Attr::FrameworkKey, key.as_str())))
            .collect()
    }

    /// `manage-own`: restrict to the actor's organisations (direct or through the project chain)
    pub fn organisation_rule(&self, actions: &[&'static str], subject: SubjectType) -> Option<Rule> {
        if !self.has(tokens::MANAGE_OWN) || self.organisations().is_empty() {
            return None;
        }
        Some(Rule::new(actions, subject).when(Condition::is_in(
            Attr::OrganisationId,
            self.organisations().iter().copied(),
        )))
    }

    /// `manage-own`: read access for monitoring partners of a project
    pub fn monitoring_read_rule(&self, subject: SubjectType) -> Option<Rule> {
        if !self.has(tokens::MANAGE_OWN) || self.monitoring_projects().is_empty() {
            return None;
        }
        Some(Rule::new(&[READ], subject).when(Condition::is_in(
            Attr::ProjectId,
            self.monitoring_projects().iter().copied(),
        )))
    }

    /// `projects-manage`: restrict to projects the actor manages
    pub fn managing_rule(&self, actions: &[&'static str], subject: SubjectType) -> Option<Rule> {
        if !self.has(tokens::PROJECTS_MANAGE) || self.managing_projects().is_empty() {
            return None;
        }
        Some(Rule::new(actions, subject).when(Condition::is_in(
            Attr::ProjectId,
            self.managing_projects().iter().copied(),
        )))
    }

    /// Unconditional read if any of `read_tokens` is held
    pub fn blanket_read(&self, read_tokens: &[&str], subject: SubjectType) -> Option<Rule> {
        read_tokens
            .iter()
            .any(|token| self.has(token))
            .then(|| Rule::new(&[READ], subject))
    }

    /// Ownership grant: `createdBy == actor`, only meaningful for instances
    pub fn created_by_rule(&self, actions: &[&'static str], subject: SubjectType) -> Rule {
        Rule::new(actions, subject)
            .when(Condition::eq(Attr::CreatedBy, self.user_id))
            .instance_only()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::managing;
    use super::*;

    #[test]
    fn test_one_framework_rule_per_key() {
        let tokens: TokenSet = ["framework-ppc", "framework-terrafund"].into_iter().collect();
        let membership = MembershipSnapshot::default();
        let ctx = PolicyContext::new(1, &tokens, &membership);

        let rules = ctx.framework_rules(&[READ], SubjectType::Project);
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|r| r.condition.is_some()));
    }

    #[test]
    fn test_manage_own_without_organisations_adds_nothing() {
        let tokens: TokenSet = ["manage-own"].into_iter().collect();
        let membership = MembershipSnapshot::default();
        let ctx = PolicyContext::new(1, &tokens, &membership);

        assert!(ctx.organisation_rule(&[READ], SubjectType::Project).is_none());
    }

    #[test]
    fn test_membership_without_token_adds_nothing() {
        let tokens = TokenSet::new();
        let membership = managing(&[5]);
        let ctx = PolicyContext::new(1, &tokens, &membership);

        assert!(ctx.managing_rule(&[READ], SubjectType::Task).is_none());
        assert!(ctx.blanket_read(&["projects-read"], SubjectType::Task).is_none());
    }

    #[test]
    fn test_created_by_rule_is_instance_only() {
        let tokens = TokenSet::new();
        let membership = MembershipSnapshot::default();
        let ctx = PolicyContext::new(123, &tokens, &membership);

        let rule = ctx.created_by_rule(&[READ], SubjectType::Media);
        assert!(rule.instance_only);
        assert_eq!(rule.condition, Some(Condition::eq(Attr::CreatedBy, 123_i64)));
    }
}
