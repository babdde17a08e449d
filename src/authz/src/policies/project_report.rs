//! Project report policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, DELETE_FILES, READ, UPDATE, UPLOAD_FILES};
use crate::types::tokens::PROJECTS_READ;

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, APPROVE, UPLOAD_FILES, DELETE_FILES];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, UPLOAD_FILES, DELETE_FILES];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::ProjectReport);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ], SubjectType::ProjectReport));
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::ProjectReport));
    rules.extend(ctx.managing_rule(OWNER_ACTIONS, SubjectType::ProjectReport));
    rules
}
