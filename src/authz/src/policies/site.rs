//! Site policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, DELETE_FILES, READ, UPDATE, UPLOAD_FILES};
use crate::types::tokens::{PROJECTS_READ, VIEW_DASHBOARD};

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, APPROVE, UPLOAD_FILES, DELETE_FILES];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, UPLOAD_FILES, DELETE_FILES];

/// Ownership of a site is its project's organisation
pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::Site);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ, VIEW_DASHBOARD], SubjectType::Site));
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::Site));
    rules.extend(ctx.monitoring_read_rule(SubjectType::Site));
    rules.extend(ctx.managing_rule(OWNER_ACTIONS, SubjectType::Site));
    rules
}
