//! Resume schema: the typed record returned to callers plus the declarative
//! field descriptor that drives merge, coercion, validation and prompting.
//!
//! The descriptor (`RESUME_FIELDS`) and the serde structs below describe the
//! same shape. `test_skeleton_matches_typed_default` keeps them in lockstep.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Typed record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeRecord {
    pub personal_information: PersonalInformation,
    pub professional_summary: Option<String>,
    pub education: Vec<EducationItem>,
    pub work_experience: Vec<WorkExperienceItem>,
    pub skills: SkillSet,
    pub projects: Vec<ProjectItem>,
    pub additional_information: AdditionalInformation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonalInformation {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Absolute http(s) URL or null.
    pub linkedin: Option<String>,
    /// Absolute http(s) URL or null.
    pub github: Option<String>,
    /// Portfolio / personal site. Absolute http(s) URL or null.
    pub website: Option<String>,
}

/// Dates are kept verbatim; resumes mix "2019", "Jan 2019", "01/2019", "Present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EducationItem {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkExperienceItem {
    pub company: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub responsibilities: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillSet {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub databases: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdditionalInformation {
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub awards: Vec<String>,
    pub publications: Vec<String>,
    pub interests: Vec<String>,
}

/// A (display text, target URL) pair harvested from the source document's
/// link annotations. Used only during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinkHint {
    #[serde(alias = "display_text")]
    pub text: String,
    pub url: String,
}

impl HyperlinkHint {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field descriptor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Optional free text.
    Text,
    /// Optional free text; "Present" is not accepted.
    StartDate,
    /// Optional free text; "Present" is accepted.
    EndDate,
    /// Optional absolute http(s) URL.
    Link,
    /// List of plain strings.
    TextList,
    /// Nested object with a fixed key set, always present.
    Section(&'static [FieldSpec]),
    /// Ordered list of objects with a fixed key set.
    Entries(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

pub const PERSONAL_INFORMATION_FIELDS: &[FieldSpec] = &[
    field("full_name", FieldKind::Text),
    field("email", FieldKind::Text),
    field("phone", FieldKind::Text),
    field("location", FieldKind::Text),
    field("linkedin", FieldKind::Link),
    field("github", FieldKind::Link),
    field("website", FieldKind::Link),
];

pub const EDUCATION_FIELDS: &[FieldSpec] = &[
    field("institution", FieldKind::Text),
    field("degree", FieldKind::Text),
    field("field_of_study", FieldKind::Text),
    field("start_date", FieldKind::StartDate),
    field("end_date", FieldKind::EndDate),
    field("gpa", FieldKind::Text),
];

pub const WORK_EXPERIENCE_FIELDS: &[FieldSpec] = &[
    field("company", FieldKind::Text),
    field("title", FieldKind::Text),
    field("start_date", FieldKind::StartDate),
    field("end_date", FieldKind::EndDate),
    field("responsibilities", FieldKind::TextList),
    field("technologies", FieldKind::TextList),
];

pub const SKILL_FIELDS: &[FieldSpec] = &[
    field("languages", FieldKind::TextList),
    field("frameworks", FieldKind::TextList),
    field("tools", FieldKind::TextList),
    field("databases", FieldKind::TextList),
    field("certifications", FieldKind::TextList),
];

pub const PROJECT_FIELDS: &[FieldSpec] = &[
    field("name", FieldKind::Text),
    field("description", FieldKind::Text),
    field("technologies", FieldKind::TextList),
    field("link", FieldKind::Link),
];

pub const ADDITIONAL_INFORMATION_FIELDS: &[FieldSpec] = &[
    field("certifications", FieldKind::TextList),
    field("languages", FieldKind::TextList),
    field("awards", FieldKind::TextList),
    field("publications", FieldKind::TextList),
    field("interests", FieldKind::TextList),
];

pub const RESUME_FIELDS: &[FieldSpec] = &[
    field(
        "personal_information",
        FieldKind::Section(PERSONAL_INFORMATION_FIELDS),
    ),
    field("professional_summary", FieldKind::Text),
    field("education", FieldKind::Entries(EDUCATION_FIELDS)),
    field("work_experience", FieldKind::Entries(WORK_EXPERIENCE_FIELDS)),
    field("skills", FieldKind::Section(SKILL_FIELDS)),
    field("projects", FieldKind::Entries(PROJECT_FIELDS)),
    field(
        "additional_information",
        FieldKind::Section(ADDITIONAL_INFORMATION_FIELDS),
    ),
];

/// Default value a field takes when the model omits it.
pub fn default_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text | FieldKind::StartDate | FieldKind::EndDate | FieldKind::Link => {
            Value::Null
        }
        FieldKind::TextList | FieldKind::Entries(_) => Value::Array(Vec::new()),
        FieldKind::Section(fields) => Value::Object(section_defaults(fields)),
    }
}

fn section_defaults(fields: &[FieldSpec]) -> Map<String, Value> {
    fields
        .iter()
        .map(|spec| (spec.name.to_string(), default_value(spec.kind)))
        .collect()
}

/// The all-defaults record, built once and shared read-only.
/// Callers must clone before mutating.
pub fn default_skeleton() -> &'static Map<String, Value> {
    static SKELETON: OnceLock<Map<String, Value>> = OnceLock::new();
    SKELETON.get_or_init(|| section_defaults(RESUME_FIELDS))
}

/// Example record shape for the prompt: like the skeleton, but entry lists
/// carry one all-null sample item so the model sees the item keys.
pub fn prompt_shape() -> Value {
    fn shape(fields: &[FieldSpec]) -> Value {
        Value::Object(
            fields
                .iter()
                .map(|spec| {
                    let value = match spec.kind {
                        FieldKind::Section(nested) => shape(nested),
                        FieldKind::Entries(nested) => Value::Array(vec![shape(nested)]),
                        other => default_value(other),
                    };
                    (spec.name.to_string(), value)
                })
                .collect(),
        )
    }
    shape(RESUME_FIELDS)
}
