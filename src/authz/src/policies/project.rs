//! Project policy
//!
//! Projects carry their own `organisationId` and `frameworkKey`, so every
//! condition here is evaluated against direct columns.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, DELETE_FILES, READ, UPDATE, UPLOAD_FILES};
use crate::types::tokens::{PROJECTS_READ, VIEW_DASHBOARD};

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, APPROVE, UPLOAD_FILES, DELETE_FILES];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, UPLOAD_FILES, DELETE_FILES];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::Project);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ, VIEW_DASHBOARD], SubjectType::Project));
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::Project));
    rules.extend(ctx.monitoring_read_rule(SubjectType::Project));
    rules.extend(ctx.managing_rule(OWNER_ACTIONS, SubjectType::Project));
    rules
}
