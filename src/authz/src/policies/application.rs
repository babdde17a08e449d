//! Funding application policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, READ, UPDATE};

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, APPROVE];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::Application);
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::Application));
    rules
}
