//! Authorization subjects: resource types, instance attributes and the
//! instance-or-class subject handed to the service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types the engine knows how to name in rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectType {
    Project,
    Site,
    Nursery,
    ProjectReport,
    SiteReport,
    NurseryReport,
    Organisation,
    Application,
    FormSubmission,
    ProjectPitch,
    FundingProgramme,
    Disturbance,
    TrackingEntry,
    ProjectPolygon,
    Task,
    Media,
    User,
}

impl SubjectType {
    /// Every known subject type
    pub const ALL: [SubjectType; 17] = [
        SubjectType::Project,
        SubjectType::Site,
        SubjectType::Nursery,
        SubjectType::ProjectReport,
        SubjectType::SiteReport,
        SubjectType::NurseryReport,
        SubjectType::Organisation,
        SubjectType::Application,
        SubjectType::FormSubmission,
        SubjectType::ProjectPitch,
        SubjectType::FundingProgramme,
        SubjectType::Disturbance,
        SubjectType::TrackingEntry,
        SubjectType::ProjectPolygon,
        SubjectType::Task,
        SubjectType::Media,
        SubjectType::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Project => "Project",
            SubjectType::Site => "Site",
            SubjectType::Nursery => "Nursery",
            SubjectType::ProjectReport => "ProjectReport",
            SubjectType::SiteReport => "SiteReport",
            SubjectType::NurseryReport => "NurseryReport",
            SubjectType::Organisation => "Organisation",
            SubjectType::Application => "Application",
            SubjectType::FormSubmission => "FormSubmission",
            SubjectType::ProjectPitch => "ProjectPitch",
            SubjectType::FundingProgramme => "FundingProgramme",
            SubjectType::Disturbance => "Disturbance",
            SubjectType::TrackingEntry => "TrackingEntry",
            SubjectType::ProjectPolygon => "ProjectPolygon",
            SubjectType::Task => "Task",
            SubjectType::Media => "Media",
            SubjectType::User => "User",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instance fields that participate in authorization
///
/// `OrganisationId` and `ProjectId` may be direct columns or the end of a
/// parent chain; records resolve them either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attr {
    Id,
    OrganisationId,
    ProjectId,
    FrameworkKey,
    CreatedBy,
}

/// A resolved attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Text(String),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(value) => Some(*value),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            AttrValue::Int(_) => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// A domain record that can be authorized at instance level
///
/// `attr` returns `None` for anything the record cannot resolve, including a
/// broken parent chain. The engine treats `None` as "condition not met".
pub trait Record: Send + Sync {
    /// Runtime resource type of this record
    fn subject_type(&self) -> SubjectType;

    /// Resolve one authorization attribute
    fn attr(&self, attr: Attr) -> Option<AttrValue>;
}

/// What an action is being performed on
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    /// A concrete record
    Instance(&'a dyn Record),

    /// The resource type as a whole, e.g. "may this user create any Organisation"
    Class(SubjectType),
}

impl<'a> Subject<'a> {
    pub fn instance(record: &'a dyn Record) -> Self {
        Subject::Instance(record)
    }

    pub fn class(subject_type: SubjectType) -> Self {
        Subject::Class(subject_type)
    }

    /// Runtime type for instances, declared type for classes
    pub fn subject_type(&self) -> SubjectType {
        match self {
            Subject::Instance(record) => record.subject_type(),
            Subject::Class(subject_type) => *subject_type,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Subject::Class(_))
    }
}

impl fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Instance(record) => write!(f, "Instance({})", record.subject_type()),
            Subject::Class(subject_type) => write!(f, "Class({})", subject_type),
        }
    }
}

impl<'a, R: Record> From<&'a R> for Subject<'a> {
    fn from(record: &'a R) -> Self {
        Subject::Instance(record)
    }
}

impl From<SubjectType> for Subject<'_> {
    fn from(subject_type: SubjectType) -> Self {
        Subject::Class(subject_type)
    }
}

pub(crate) fn id_value(id: Option<i64>) -> Option<AttrValue> {
    id.map(AttrValue::Int)
}

pub(crate) fn text_value(value: Option<&String>) -> Option<AttrValue> {
    value.map(|v| AttrValue::Text(v.clone()))
}
