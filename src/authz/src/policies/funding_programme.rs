//! Funding programme policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{READ, UPDATE};

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    ctx.framework_rules(&[READ, UPDATE], SubjectType::FundingProgramme)
}
