//! Project polygon policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{DELETE, READ, UPDATE};
use crate::types::tokens::{PROJECTS_READ, VIEW_DASHBOARD};

const ACTIONS: &[&str] = &[READ, UPDATE, DELETE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ACTIONS, SubjectType::ProjectPolygon);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ, VIEW_DASHBOARD], SubjectType::ProjectPolygon));
    rules.extend(ctx.organisation_rule(ACTIONS, SubjectType::ProjectPolygon));
    rules.extend(ctx.managing_rule(ACTIONS, SubjectType::ProjectPolygon));
    rules
}
