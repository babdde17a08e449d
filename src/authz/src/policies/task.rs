//! Task policy
//!
//! Tasks group a project's reports for one due date. They inherit the
//! project's framework and organisation.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, READ, UPDATE};
use crate::types::tokens::PROJECTS_READ;

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, APPROVE];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::Task);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ], SubjectType::Task));
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::Task));
    rules.extend(ctx.managing_rule(OWNER_ACTIONS, SubjectType::Task));
    rules
}
