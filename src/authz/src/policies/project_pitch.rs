//! Project pitch policy

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{DELETE, READ, UPDATE};

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = Vec::new();

    // Pitches predate framework assignment, so framework admins read them all.
    if !ctx.frameworks().is_empty() {
        rules.push(Rule::new(&[READ], SubjectType::ProjectPitch));
    }

    rules.extend(ctx.organisation_rule(&[READ, UPDATE, DELETE], SubjectType::ProjectPitch));
    rules
}
