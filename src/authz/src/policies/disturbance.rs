//! Disturbance policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{DELETE, READ, UPDATE};
use crate::types::tokens::PROJECTS_READ;

const ACTIONS: &[&str] = &[READ, UPDATE, DELETE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ACTIONS, SubjectType::Disturbance);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ], SubjectType::Disturbance));
    rules.extend(ctx.organisation_rule(ACTIONS, SubjectType::Disturbance));
    rules.extend(ctx.managing_rule(ACTIONS, SubjectType::Disturbance));
    rules
}
