//! Site report policy
//!
//! A site report has no organisation of its own. `manage-own` and
//! `projects-manage` both reach it through report → site → project, and a
//! break anywhere in that chain denies.

use crate::policies::PolicyContext;
use crate::rule::Rule;
use crate::subject::SubjectType;
use crate::types::actions::{APPROVE, DELETE, DELETE_FILES, READ, UPDATE, UPLOAD_FILES};
use crate::types::tokens::PROJECTS_READ;

const ADMIN_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, APPROVE, UPLOAD_FILES, DELETE_FILES];
const OWNER_ACTIONS: &[&str] = &[READ, UPDATE, DELETE, UPLOAD_FILES, DELETE_FILES];

pub fn rules(ctx: &PolicyContext<'_>) -> Vec<Rule> {
    let mut rules = ctx.framework_rules(ADMIN_ACTIONS, SubjectType::SiteReport);
    rules.extend(ctx.blanket_read(&[PROJECTS_READ], SubjectType::SiteReport));
    rules.extend(ctx.organisation_rule(OWNER_ACTIONS, SubjectType::SiteReport));
    rules.extend(ctx.managing_rule(OWNER_ACTIONS, SubjectType::SiteReport));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ProjectRef, SiteRef, SiteReport};
    use crate::policies::test_support::{allows, orgs, rules_for};
    use crate::types::MembershipSnapshot;

    fn report(framework_key: &str, site: Option<SiteRef>) -> SiteReport {
        SiteReport {
            id: 11,
            framework_key: Some(framework_key.to_string()),
            site,
        }
    }

    #[test]
    fn test_framework_isolation() {
        let rules = rules_for(rules, 123, &["framework-ppc"], &MembershipSnapshot::default());

        assert!(allows(&rules, READ, &report("ppc", None)));
        assert!(allows(&rules, DELETE, &report("ppc", None)));
        assert!(!allows(&rules, READ, &report("terrafund", None)));
        assert!(!allows(&rules, DELETE, &report("terrafund", None)));
    }

    #[test]
    fn test_transitive_ownership() {
        let rules = rules_for(rules, 7, &["manage-own"], &orgs(&[42]));
        let site = SiteRef {
            id: 3,
            project: Some(ProjectRef::new(5).with_organisation(42)),
        };

        for action in OWNER_ACTIONS {
            assert!(allows(&rules, action, &report("ppc", Some(site.clone()))), "{}", action);
        }
        assert!(!allows(&rules, APPROVE, &report("ppc", Some(site))));
    }

    #[test]
    fn test_null_parent_denies() {
        let rules = rules_for(rules, 7, &["manage-own"], &orgs(&[42]));

        assert!(!allows(&rules, READ, &report("ppc", None)));
        assert!(!allows(&rules, READ, &report("ppc", Some(SiteRef { id: 3, project: None }))));
    }
}
