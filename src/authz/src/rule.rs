//! Authorization rules and the condition interpreter
//!
//! A rule grants a set of actions on one subject type, optionally restricted
//! by a [`Condition`] over instance attributes. Conditions are a closed tagged
//! union so every policy's restrictions can be read straight off its source.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::subject::{Attr, AttrValue, Record, Subject, SubjectType};

/// Predicate over instance attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Attribute equals a value
    Eq { attr: Attr, value: AttrValue },

    /// Attribute is one of a set of values; an empty set never matches
    In {
        attr: Attr,
        values: BTreeSet<AttrValue>,
    },

    /// Every sub-condition holds
    ///
    /// The built-in policies need one attribute per rule; this variant is
    /// for policies registered by the host that restrict on several.
    All { conditions: Vec<Condition> },
}

impl Condition {
    pub fn eq(attr: Attr, value: impl Into<AttrValue>) -> Self {
        Condition::Eq {
            attr,
            value: value.into(),
        }
    }

    pub fn is_in<I, V>(attr: Attr, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Condition::In {
            attr,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All { conditions }
    }

    /// Evaluate against an instance. Unresolvable attributes evaluate false.
    pub fn evaluate(&self, snapshot: &mut AttrSnapshot<'_>) -> bool {
        match self {
            Condition::Eq { attr, value } => snapshot.get(*attr) == Some(value),
            Condition::In { attr, values } => match snapshot.get(*attr) {
                Some(actual) => values.contains(actual),
                None => false,
            },
            Condition::All { conditions } => conditions.iter().all(|c| c.evaluate(snapshot)),
        }
    }
}

/// Attribute values of one record, resolved lazily and at most once per call
///
/// Parent chains (report → site → project → organisation) are walked the first
/// time any rule asks for the attribute and reused by every later rule.
pub struct AttrSnapshot<'a> {
    record: &'a dyn Record,
    resolved: HashMap<Attr, Option<AttrValue>>,
}

impl<'a> AttrSnapshot<'a> {
    pub fn new(record: &'a dyn Record) -> Self {
        Self {
            record,
            resolved: HashMap::new(),
        }
    }

    pub fn get(&mut self, attr: Attr) -> Option<&AttrValue> {
        let record = self.record;
        self.resolved
            .entry(attr)
            .or_insert_with(|| record.attr(attr))
            .as_ref()
    }

    /// Number of distinct attributes resolved so far
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

/// A single grant produced by an entity policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Actions this rule grants
    pub actions: Vec<&'static str>,

    /// Resource type the rule applies to
    pub subject: SubjectType,

    /// Instance restriction; `None` matches every instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Skip this rule for class-level checks
    pub instance_only: bool,
}

impl Rule {
    /// Unconditional grant of `actions` on `subject`
    pub fn new(actions: &[&'static str], subject: SubjectType) -> Self {
        Self {
            actions: actions.to_vec(),
            subject,
            condition: None,
            instance_only: false,
        }
    }

    /// Restrict the rule to instances satisfying `condition`
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Mark the rule as needing instance data (ownership, self-access)
    pub fn instance_only(mut self) -> Self {
        self.instance_only = true;
        self
    }

    pub fn grants(&self, action: &str) -> bool {
        self.actions.iter().any(|a| *a == action)
    }

    /// Class-level match: conditions hold vacuously, instance-only rules are skipped
    pub fn matches_class(&self, action: &str, subject: SubjectType) -> bool {
        !self.instance_only && self.subject == subject && self.grants(action)
    }

    /// Instance-level match against the snapshot's record
    pub fn matches_instance(&self, action: &str, snapshot: &mut AttrSnapshot<'_>) -> bool {
        if self.subject != snapshot.record.subject_type() || !self.grants(action) {
            return false;
        }

        match &self.condition {
            Some(condition) => condition.evaluate(snapshot),
            None => true,
        }
    }
}

/// Index of the first rule allowing `action` on `subject`, if any
pub fn first_match(rules: &[Rule], action: &str, subject: Subject<'_>) -> Option<usize> {
    match subject {
        Subject::Class(subject_type) => rules
            .iter()
            .position(|rule| rule.matches_class(action, subject_type)),
        Subject::Instance(record) => {
            let mut snapshot = AttrSnapshot::new(record);
            rules
                .iter()
                .position(|rule| rule.matches_instance(action, &mut snapshot))
        }
    }
}

/// Index of the first rule allowing any of `actions` on `subject`
///
/// One attribute snapshot serves every action, so parent chains are walked
/// once per call.
pub fn first_match_any(rules: &[Rule], actions: &[&str], subject: Subject<'_>) -> Option<usize> {
    match subject {
        Subject::Class(subject_type) => actions.iter().find_map(|action| {
            rules
                .iter()
                .position(|rule| rule.matches_class(action, subject_type))
        }),
        Subject::Instance(record) => {
            let mut snapshot = AttrSnapshot::new(record);
            actions.iter().find_map(|action| {
                rules
                    .iter()
                    .position(|rule| rule.matches_instance(action, &mut snapshot))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Project, ProjectRef, SiteRef, SiteReport};
    use crate::types::actions::{DELETE, READ, UPDATE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ppc_project() -> Project {
        Project {
            id: 5,
            organisation_id: Some(42),
            framework_key: Some("ppc".to_string()),
        }
    }

    #[test]
    fn test_unconditional_rule_matches_any_instance() {
        let rule = Rule::new(&[READ], SubjectType::Project);
        let project = ppc_project();
        let mut snapshot = AttrSnapshot::new(&project);

        assert!(rule.matches_instance(READ, &mut snapshot));
        assert!(!rule.matches_instance(DELETE, &mut snapshot));
    }

    #[test]
    fn test_in_condition() {
        let rule = Rule::new(&[READ, UPDATE], SubjectType::Project)
            .when(Condition::is_in(Attr::OrganisationId, [1_i64, 4, 42]));
        let project = ppc_project();

        assert_eq!(first_match(&[rule.clone()], UPDATE, Subject::from(&project)), Some(0));

        let other = Project {
            organisation_id: Some(99),
            ..ppc_project()
        };
        assert_eq!(first_match(&[rule], UPDATE, Subject::from(&other)), None);
    }

    #[test]
    fn test_empty_in_set_never_matches() {
        let rule = Rule::new(&[READ], SubjectType::Project)
            .when(Condition::is_in(Attr::OrganisationId, Vec::<i64>::new()));

        assert_eq!(first_match(&[rule], READ, Subject::from(&ppc_project())), None);
    }

    #[test]
    fn test_all_condition_requires_every_part() {
        let condition = Condition::all(vec![
            Condition::eq(Attr::FrameworkKey, "ppc"),
            Condition::eq(Attr::OrganisationId, 42_i64),
        ]);
        let project = ppc_project();
        let mut snapshot = AttrSnapshot::new(&project);
        assert!(condition.evaluate(&mut snapshot));

        let other = Project {
            framework_key: Some("terrafund".to_string()),
            ..ppc_project()
        };
        let mut snapshot = AttrSnapshot::new(&other);
        assert!(!condition.evaluate(&mut snapshot));
    }

    #[test]
    fn test_unresolvable_attribute_is_false() {
        let report = SiteReport {
            id: 1,
            framework_key: None,
            site: Some(SiteRef { id: 2, project: None }),
        };
        let rule = Rule::new(&[READ], SubjectType::SiteReport)
            .when(Condition::is_in(Attr::OrganisationId, [42_i64]));

        assert_eq!(first_match(&[rule], READ, Subject::from(&report)), None);
    }

    #[test]
    fn test_subject_type_must_match() {
        let rule = Rule::new(&[READ], SubjectType::Site);
        assert_eq!(first_match(&[rule], READ, Subject::from(&ppc_project())), None);
    }

    #[test]
    fn test_class_level_skips_instance_only_rules() {
        let rules = vec![
            Rule::new(&[READ], SubjectType::User)
                .when(Condition::eq(Attr::Id, 7_i64))
                .instance_only(),
            Rule::new(&[UPDATE], SubjectType::Project)
                .when(Condition::is_in(Attr::FrameworkKey, ["ppc"])),
        ];

        assert_eq!(first_match(&rules, READ, Subject::class(SubjectType::User)), None);
        assert_eq!(
            first_match(&rules, UPDATE, Subject::class(SubjectType::Project)),
            Some(1)
        );
    }

    #[test]
    fn test_snapshot_resolves_each_attribute_once() {
        let report = SiteReport {
            id: 1,
            framework_key: Some("ppc".to_string()),
            site: Some(SiteRef {
                id: 2,
                project: Some(ProjectRef::new(5).with_organisation(42)),
            }),
        };
        let rules = vec![
            Rule::new(&[DELETE], SubjectType::SiteReport)
                .when(Condition::is_in(Attr::OrganisationId, [1_i64])),
            Rule::new(&[DELETE], SubjectType::SiteReport)
                .when(Condition::is_in(Attr::OrganisationId, [2_i64])),
            Rule::new(&[DELETE], SubjectType::SiteReport)
                .when(Condition::is_in(Attr::OrganisationId, [42_i64])),
        ];

        let mut snapshot = AttrSnapshot::new(&report);
        let matched = rules
            .iter()
            .position(|rule| rule.matches_instance(DELETE, &mut snapshot));

        assert_eq!(matched, Some(2));
        assert_eq!(snapshot.resolved_count(), 1);
    }

    /// Site report whose organisation lookup counts chain walks
    struct CountingReport {
        walks: AtomicUsize,
    }

    impl Record for CountingReport {
        fn subject_type(&self) -> SubjectType {
            SubjectType::SiteReport
        }

        fn attr(&self, attr: Attr) -> Option<AttrValue> {
            match attr {
                Attr::OrganisationId => {
                    self.walks.fetch_add(1, Ordering::SeqCst);
                    Some(AttrValue::Int(42))
                }
                _ => None,
            }
        }
    }

    #[test]
    fn test_first_match_any_walks_chain_once() {
        let report = CountingReport {
            walks: AtomicUsize::new(0),
        };
        let rules = vec![
            Rule::new(&["approve", DELETE, UPDATE, READ], SubjectType::SiteReport)
                .when(Condition::is_in(Attr::OrganisationId, [7_i64])),
            Rule::new(&[READ], SubjectType::SiteReport)
                .when(Condition::is_in(Attr::OrganisationId, [42_i64])),
        ];

        let matched = first_match_any(&rules, &["approve", DELETE, UPDATE, READ], Subject::from(&report));

        assert_eq!(matched, Some(1));
        assert_eq!(report.walks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_first_match_any_class_level() {
        let rules = vec![Rule::new(&[UPDATE], SubjectType::Project)];

        assert_eq!(
            first_match_any(&rules, &[READ, UPDATE], Subject::class(SubjectType::Project)),
            Some(0)
        );
        assert_eq!(first_match_any(&rules, &[], Subject::class(SubjectType::Project)), None);
    }

    #[test]
    fn test_rule_serializes_for_review() {
        let rule = Rule::new(&[READ], SubjectType::Project)
            .when(Condition::is_in(Attr::FrameworkKey, ["ppc"]));
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["subject"], "Project");
        assert_eq!(json["condition"]["op"], "in");
        assert_eq!(json["condition"]["values"][0], "ppc");
    }
}
