//! Organisation policy
//!
//! `create` has no instance to inspect, so it is granted by an unconditional
//! rule and checked at class level.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, CREATE, DELETE, READ, UPDATE};
use crate::types::tokens::{USERS_MANAGE, VIEW_DASHBOARD};

const ADMIN_ACTIONS: &[&str] = &[READ, CREATE, UPDATE, DELETE, APPROVE];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = Vec::new();

    if ctx.has(USERS_MANAGE) {
        rules.push(Rule::new(ADMIN_ACTIONS, SubjectType::Organisation));
    }

    // Framework admins review applicants from every organisation.
    if !ctx.frameworks().is_empty() || ctx.has(VIEW_DASHBOARD) {
        rules.push(Rule::new(&[READ], SubjectType::Organisation));
    }

    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::Organisation));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Organisation;
    use crate::policies::test_support::{allows, allows_class, orgs, rules_for};
    use crate::types::MembershipSnapshot;

    #[test]
    fn test_create_requires_users_manage() {
        let admin = rules_for(rules, 1, &["users-manage"], &MembershipSnapshot::default());
        assert!(allows_class(&admin, CREATE, SubjectType::Organisation));

        let owner = rules_for(rules, 7, &["manage-own"], &orgs(&[42]));
        assert!(!allows_class(&owner, CREATE, SubjectType::Organisation));
    }

    #[test]
    fn test_owner_updates_own_organisation_only() {
        let rules = rules_for(rules, 7, &["manage-own"], &orgs(&[42]));

        assert!(allows(&rules, UPDATE, &Organisation { id: 42 }));
        assert!(!allows(&rules, UPDATE, &Organisation { id: 99 }));
        assert!(!allows(&rules, DELETE, &Organisation { id: 42 }));
    }

    #[test]
    fn test_framework_admin_reads_any_organisation() {
        let rules = rules_for(rules, 1, &["framework-ppc"], &MembershipSnapshot::default());

        assert!(allows(&rules, READ, &Organisation { id: 99 }));
        assert!(!allows(&rules, APPROVE, &Organisation { id: 99 }));
    }
}
