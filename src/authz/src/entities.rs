//! Resource records as seen by the policy engine
//!
//! These are read-side views populated by the host service. Each carries only
//! the fields that take part in authorization, plus the parent chain needed to
//! reach a project and its organisation. A `None` anywhere in a chain makes the
//! attributes behind it unresolvable.

use serde::{Deserialize, Serialize};

use crate::subject::{id_value, text_value, Attr, AttrValue, Record, SubjectType};
use crate::types::{OrgId, ProjectId, UserId};

/// Parent project reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub organisation_id: Option<OrgId>,
    pub framework_key: Option<String>,
}

impl ProjectRef {
    pub fn new(id: ProjectId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_organisation(mut self, organisation_id: OrgId) -> Self {
        self.organisation_id = Some(organisation_id);
        self
    }

    pub fn with_framework(mut self, framework_key: impl Into<String>) -> Self {
        self.framework_key = Some(framework_key.into());
        self
    }
}

/// Parent site reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRef {
    pub id: i64,
    pub project: Option<ProjectRef>,
}

/// Parent nursery reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseryRef {
    pub id: i64,
    pub project: Option<ProjectRef>,
}

/// The entity a disturbance, tracking entry or media item is attached to,
/// flattened to what authorization needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEntity {
    pub framework_key: Option<String>,
    pub project: Option<ProjectRef>,
}

/// Resolve a project-chain attribute
fn via_project(project: Option<&ProjectRef>, attr: Attr) -> Option<AttrValue> {
    let project = project?;
    match attr {
        Attr::ProjectId => id_value(Some(project.id)),
        Attr::OrganisationId => id_value(project.organisation_id),
        Attr::FrameworkKey => text_value(project.framework_key.as_ref()),
        Attr::Id | Attr::CreatedBy => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub organisation_id: Option<OrgId>,
    pub framework_key: Option<String>,
}

impl Record for Project {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Project
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id | Attr::ProjectId => id_value(Some(self.id)),
            Attr::OrganisationId => id_value(self.organisation_id),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            Attr::CreatedBy => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub framework_key: Option<String>,
    pub project: Option<ProjectRef>,
}

impl Record for Site {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Site
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => via_project(self.project.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nursery {
    pub id: i64,
    pub framework_key: Option<String>,
    pub project: Option<ProjectRef>,
}

impl Record for Nursery {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Nursery
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => via_project(self.project.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub id: i64,
    pub framework_key: Option<String>,
    pub project: Option<ProjectRef>,
}

impl Record for ProjectReport {
    fn subject_type(&self) -> SubjectType {
        SubjectType::ProjectReport
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => via_project(self.project.as_ref(), attr),
        }
    }
}

/// Report on a site; authority comes from the site's project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteReport {
    pub id: i64,
    pub framework_key: Option<String>,
    pub site: Option<SiteRef>,
}

impl Record for SiteReport {
    fn subject_type(&self) -> SubjectType {
        SubjectType::SiteReport
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => via_project(self.site.as_ref()?.project.as_ref(), attr),
        }
    }
}

/// Report on a nursery; authority comes from the nursery's project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseryReport {
    pub id: i64,
    pub framework_key: Option<String>,
    pub nursery: Option<NurseryRef>,
}

impl Record for NurseryReport {
    fn subject_type(&self) -> SubjectType {
        SubjectType::NurseryReport
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => via_project(self.nursery.as_ref()?.project.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: OrgId,
}

impl Record for Organisation {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Organisation
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id | Attr::OrganisationId => id_value(Some(self.id)),
            _ => None,
        }
    }
}

/// Funding application; the framework comes from its funding programme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub organisation_id: Option<OrgId>,
    pub framework_key: Option<String>,
}

impl Record for Application {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Application
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::OrganisationId => id_value(self.organisation_id),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            Attr::ProjectId | Attr::CreatedBy => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub id: i64,
    pub organisation_id: Option<OrgId>,
    pub framework_key: Option<String>,
    pub created_by: Option<UserId>,
}

impl Record for FormSubmission {
    fn subject_type(&self) -> SubjectType {
        SubjectType::FormSubmission
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::OrganisationId => id_value(self.organisation_id),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            Attr::CreatedBy => id_value(self.created_by),
            Attr::ProjectId => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPitch {
    pub id: i64,
    pub organisation_id: Option<OrgId>,
}

impl Record for ProjectPitch {
    fn subject_type(&self) -> SubjectType {
        SubjectType::ProjectPitch
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::OrganisationId => id_value(self.organisation_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingProgramme {
    pub id: i64,
    pub framework_key: Option<String>,
}

impl Record for FundingProgramme {
    fn subject_type(&self) -> SubjectType {
        SubjectType::FundingProgramme
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::FrameworkKey => text_value(self.framework_key.as_ref()),
            _ => None,
        }
    }
}

/// Resolve an attribute through an attached parent entity
fn via_parent(parent: Option<&ParentEntity>, attr: Attr) -> Option<AttrValue> {
    let parent = parent?;
    match attr {
        Attr::FrameworkKey => text_value(parent.framework_key.as_ref()),
        _ => via_project(parent.project.as_ref(), attr),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disturbance {
    pub id: i64,
    pub parent: Option<ParentEntity>,
}

impl Record for Disturbance {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Disturbance
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            _ => via_parent(self.parent.as_ref(), attr),
        }
    }
}

/// Demographic / tree-species tracking row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub id: i64,
    pub parent: Option<ParentEntity>,
}

impl Record for TrackingEntry {
    fn subject_type(&self) -> SubjectType {
        SubjectType::TrackingEntry
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            _ => via_parent(self.parent.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPolygon {
    pub id: i64,
    pub project: Option<ProjectRef>,
    pub created_by: Option<UserId>,
}

impl Record for ProjectPolygon {
    fn subject_type(&self) -> SubjectType {
        SubjectType::ProjectPolygon
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::CreatedBy => id_value(self.created_by),
            _ => via_project(self.project.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project: Option<ProjectRef>,
}

impl Task {
    /// Task attached directly to a project id, with no further chain data
    pub fn for_project(id: i64, project_id: ProjectId) -> Self {
        Self {
            id,
            project: Some(ProjectRef::new(project_id)),
        }
    }
}

impl Record for Task {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Task
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            _ => via_project(self.project.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub parent: Option<ParentEntity>,
    pub created_by: Option<UserId>,
}

impl Record for Media {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Media
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::CreatedBy => id_value(self.created_by),
            _ => via_parent(self.parent.as_ref(), attr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub organisation_id: Option<OrgId>,
}

impl Record for User {
    fn subject_type(&self) -> SubjectType {
        SubjectType::User
    }

    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Id => id_value(Some(self.id)),
            Attr::OrganisationId => id_value(self.organisation_id),
            _ => None,
        }
    }
}
