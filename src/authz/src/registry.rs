//! Policy registry
//!
//! Maps a subject type to the policy that builds its rules. A type without an
//! entry is denied for every action.

use std::collections::HashMap;

use crate::policies::{self, PolicyFn};
use crate::subject::{Subject, SubjectType};

/// Registry of entity policies keyed by subject type
#[derive(Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<SubjectType, PolicyFn>,
}

impl PolicyRegistry {
    /// Registry with no policies; denies everything
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in entity policy
    pub fn standard() -> Self {
        Self::empty()
            .with(SubjectType::Project, policies::project::rules)
            .with(SubjectType::Site, policies::site::rules)
            .with(SubjectType::Nursery, policies::nursery::rules)
            .with(SubjectType::ProjectReport, policies::project_report::rules)
            .with(SubjectType::SiteReport, policies::site_report::rules)
            .with(SubjectType::NurseryReport, policies::nursery_report::rules)
            .with(SubjectType::Organisation, policies::organisation::rules)
            .with(SubjectType::Application, policies::application::rules)
            .with(SubjectType::FormSubmission, policies::form_submission::rules)
            .with(SubjectType::ProjectPitch, policies::project_pitch::rules)
            .with(SubjectType::FundingProgramme, policies::funding_programme::rules)
            .with(SubjectType::Disturbance, policies::disturbance::rules)
            .with(SubjectType::TrackingEntry, policies::tracking::rules)
            .with(SubjectType::ProjectPolygon, policies::project_polygon::rules)
            .with(SubjectType::Task, policies::task::rules)
            .with(SubjectType::Media, policies::media::rules)
            .with(SubjectType::User, policies::user::rules)
    }

    /// Register (or replace) the policy for a subject type
    pub fn register(&mut self, subject_type: SubjectType, policy: PolicyFn) -> Option<PolicyFn> {
        self.policies.insert(subject_type, policy)
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, subject_type: SubjectType, policy: PolicyFn) -> Self {
        self.register(subject_type, policy);
        self
    }

    /// Drop the policy for a subject type
    pub fn unregister(&mut self, subject_type: SubjectType) -> Option<PolicyFn> {
        self.policies.remove(&subject_type)
    }

    /// Policy for an instance's runtime type or a class subject's declared type
    pub fn resolve(&self, subject: &Subject<'_>) -> Option<PolicyFn> {
        self.policies.get(&subject.subject_type()).copied()
    }

    pub fn contains(&self, subject_type: SubjectType) -> bool {
        self.policies.contains_key(&subject_type)
    }

    /// Registered subject types, in declaration order
    pub fn subject_types(&self) -> Vec<SubjectType> {
        let mut types: Vec<SubjectType> = self.policies.keys().copied().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("subject_types", &self.subject_types())
            .finish()
    }
}
