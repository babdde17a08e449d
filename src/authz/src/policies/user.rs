//! User policy
//!
//! Every authenticated actor may read their own account. Anything beyond
//! that needs `users-manage`.

use crate::policies::PolicyContext;
use crate::rule::{Condition, Rule};
use crate::subject::{Attr, SubjectType};
use crate::types::actions::{CREATE, DELETE, READ, UPDATE};
use crate::types::tokens::USERS_MANAGE;

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = vec![Rule::new(&[READ], SubjectType::User)
        .when(Condition::eq(Attr::Id, ctx.user_id()))
        .instance_only()];

    if ctx.has(USERS_MANAGE) {
        rules.push(Rule::new(&[READ, CREATE, UPDATE, DELETE], SubjectType::User));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::User;
    use crate::policies::test_support::{allows, allows_class, rules_for};
    use crate::types::MembershipSnapshot;

    #[test]
    fn test_self_read_only() {
        let rules = rules_for(rules, 7, &[], &MembershipSnapshot::default());
        let me = User {
            id: 7,
            organisation_id: None,
        };

        assert!(allows(&rules, READ, &me));
        assert!(!allows(&rules, UPDATE, &me));
        assert!(!allows(&rules, READ, &User { id: 8, organisation_id: None }));
        assert!(!allows_class(&rules, READ, SubjectType::User));
    }

    #[test]
    fn test_users_manage() {
        let rules = rules_for(rules, 7, &["users-manage"], &MembershipSnapshot::default());

        assert!(allows(&rules, DELETE, &User { id: 8, organisation_id: None }));
        assert!(allows_class(&rules, CREATE, SubjectType::User));
    }
}
