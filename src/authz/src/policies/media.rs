//! Media policy
//!
//! Media inherits framework and ownership from the entity it is attached to.
//! Bulk deletion is narrower: `media-manage` only covers items the actor
//! uploaded, expressed as one rule whose condition pins `createdBy` to the
//! actor.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{DELETE, DELETE_BULK, READ, UPDATE};
use crate::types::tokens::{MEDIA_MANAGE, PROJECTS_READ};

const ACTIONS: &[&str] = &[READ, UPDATE, DELETE];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ACTIONS, SubjectType::Media);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ], SubjectType::Media));
    rules.extend(ctx.organisation_rule(ACTIONS, SubjectType::Media));
    rules.extend(ctx.managing_rule(ACTIONS, SubjectType::Media));

    if ctx.has(MEDIA_MANAGE) {
        rules.push(ctx.created_by_rule(&[DELETE_BULK], SubjectType::Media));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Media, ParentEntity, ProjectRef};
    use crate::policies::test_support::{allows, allows_class, orgs, rules_for};
    use crate::types::MembershipSnapshot;

    fn media(created_by: i64) -> Media {
        Media {
            id: 1,
            parent: Some(ParentEntity {
                framework_key: Some("ppc".to_string()),
                project: Some(ProjectRef::new(5).with_organisation(42)),
            }),
            created_by: Some(created_by),
        }
    }

    #[test]
    fn test_bulk_delete_requires_ownership() {
        let rules = rules_for(rules, 123, &["media-manage"], &MembershipSnapshot::default());

        assert!(allows(&rules, DELETE_BULK, &media(123)));
        assert!(!allows(&rules, DELETE_BULK, &media(456)));
        assert!(!allows(&rules, DELETE, &media(123)));
    }

    #[test]
    fn test_bulk_delete_requires_token() {
        let rules = rules_for(rules, 123, &["manage-own"], &orgs(&[42]));

        assert!(allows(&rules, DELETE, &media(123)));
        assert!(!allows(&rules, DELETE_BULK, &media(123)));
    }

    #[test]
    fn test_bulk_delete_is_not_granted_at_class_level() {
        let rules = rules_for(rules, 123, &["media-manage"], &MembershipSnapshot::default());
        assert!(!allows_class(&rules, DELETE_BULK, SubjectType::Media));
    }
}
