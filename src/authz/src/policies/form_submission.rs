//! Form submission policy
//!
//! Besides organisation ownership, the member who started a submission keeps
//! read/update access to it while they hold `manage-own`.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, READ, UPDATE};
use crate::types::tokens::MANAGE_OWN;

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, APPROVE];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE, DELETE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::FormSubmission);
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::FormSubmission));

    if ctx.has(MANAGE_OWN) {
        rules.push(ctx.created_by_rule(&[READ, UPDATE], SubjectType::FormSubmission));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FormSubmission;
    use crate::policies::test_support::{allows, rules_for};
    use crate::types::MembershipSnapshot;

    #[test]
    fn test_author_without_organisation() {
        let rules = rules_for(rules, 7, &["manage-own"], &MembershipSnapshot::default());
        let submission = FormSubmission {
            id: 1,
            organisation_id: Some(42),
            framework_key: Some("ppc".to_string()),
            created_by: Some(7),
        };

        assert!(allows(&rules, UPDATE, &submission));
        assert!(!allows(&rules, DELETE, &submission));

        let someone_else = FormSubmission {
            created_by: Some(8),
            ..submission
        };
        assert!(!allows(&rules, READ, &someone_else));
    }
}
