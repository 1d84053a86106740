use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_NAME_LENGTH: usize = 3;
pub const MIN_PERSON_NAME_LENGTH: usize = 5;
pub const MIN_CONTACT_LENGTH: usize = 5;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// One community outreach initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub project_name: String,
    pub location: String,
    pub responsible_department: String,
    pub project_lead: String,
    pub academic_tutor: String,
    pub community_tutor: String,
    pub contact_information: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a record from validated input. The store decides `id` and the timestamps.
    /// Text is stored trimmed; blank optional fields are stored as absent.
    pub fn from_new(id: String, data: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project_name: trimmed(data.project_name),
            location: trimmed(data.location),
            responsible_department: trimmed(data.responsible_department),
            project_lead: trimmed(data.project_lead),
            academic_tutor: trimmed(data.academic_tutor),
            community_tutor: trimmed(data.community_tutor),
            contact_information: trimmed(data.contact_information),
            status: data.status,
            status_description: data.status_description.and_then(non_blank),
            description: trimmed(data.description),
            project_type: data.project_type.and_then(non_blank),
            public_objective: data.public_objective.and_then(non_blank),
            scope: data.scope.and_then(non_blank),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every field present in `patch`. A blank optional field clears
    /// the stored value. Timestamps are left to the caller.
    pub fn apply(&mut self, patch: ProjectPatch) {
        let ProjectPatch {
            project_name,
            location,
            responsible_department,
            project_lead,
            academic_tutor,
            community_tutor,
            contact_information,
            status,
            status_description,
            description,
            project_type,
            public_objective,
            scope,
        } = patch;

        for (slot, value) in [
            (&mut self.project_name, project_name),
            (&mut self.location, location),
            (&mut self.responsible_department, responsible_department),
            (&mut self.project_lead, project_lead),
            (&mut self.academic_tutor, academic_tutor),
            (&mut self.community_tutor, community_tutor),
            (&mut self.contact_information, contact_information),
            (&mut self.description, description),
        ] {
            if let Some(v) = value {
                *slot = trimmed(v);
            }
        }
        if let Some(v) = status {
            self.status = v;
        }
        for (slot, value) in [
            (&mut self.status_description, status_description),
            (&mut self.project_type, project_type),
            (&mut self.public_objective, public_objective),
            (&mut self.scope, scope),
        ] {
            if let Some(v) = value {
                *slot = non_blank(v);
            }
        }
    }

    /// Case-insensitive substring match over name, department, location, lead and tutors.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.project_name,
            &self.responsible_department,
            &self.location,
            &self.project_lead,
            &self.academic_tutor,
            &self.community_tutor,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

fn non_blank(value: String) -> Option<String> {
    let value = trimmed(value);
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        Self::Planning,
        Self::InProgress,
        Self::Completed,
        Self::OnHold,
    ];

    /// Spanish label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planificación",
            Self::InProgress => "En Progreso",
            Self::Completed => "Completado",
            Self::OnHold => "En Espera",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::OnHold => write!(f, "On Hold"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "in progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on hold" => Ok(Self::OnHold),
            _ => Err(format!("unknown project status: {s}")),
        }
    }
}

/// Fields supplied by the caller when creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub project_name: String,
    pub location: String,
    pub responsible_department: String,
    pub project_lead: String,
    pub academic_tutor: String,
    pub community_tutor: String,
    pub contact_information: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub status_description: Option<String>,
    pub description: String,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub public_objective: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched; an empty or
/// whitespace-only optional text field clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub responsible_department: Option<String>,
    #[serde(default)]
    pub project_lead: Option<String>,
    #[serde(default)]
    pub academic_tutor: Option<String>,
    #[serde(default)]
    pub community_tutor: Option<String>,
    #[serde(default)]
    pub contact_information: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub status_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub public_objective: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewProject> for ProjectPatch {
    fn from(data: NewProject) -> Self {
        Self {
            project_name: Some(data.project_name),
            location: Some(data.location),
            responsible_department: Some(data.responsible_department),
            project_lead: Some(data.project_lead),
            academic_tutor: Some(data.academic_tutor),
            community_tutor: Some(data.community_tutor),
            contact_information: Some(data.contact_information),
            status: Some(data.status),
            status_description: data.status_description,
            description: Some(data.description),
            project_type: data.project_type,
            public_objective: data.public_objective,
            scope: data.scope,
        }
    }
}

/// Project counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub planning: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub on_hold: usize,
}

impl ProjectStats {
    pub fn record(&mut self, status: ProjectStatus) {
        self.total += 1;
        match status {
            ProjectStatus::Planning => self.planning += 1,
            ProjectStatus::InProgress => self.in_progress += 1,
            ProjectStatus::Completed => self.completed += 1,
            ProjectStatus::OnHold => self.on_hold += 1,
        }
    }
}

// -- Validation --

/// Field-keyed validation messages, serialized as `{"field": ["msg", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Append every message from `other`.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, msgs) in other.0 {
            self.0.entry(field).or_default().extend(msgs);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn check_min_len(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.add(field, message);
    }
}

fn check_contact(errors: &mut ValidationErrors, value: &str) {
    let trimmed = value.trim();
    if !EMAIL_RE.is_match(trimmed) {
        errors.add(
            "contactInformation",
            "Por favor, introduce un correo electrónico válido.",
        );
    }
    if trimmed.chars().count() < MIN_CONTACT_LENGTH {
        errors.add(
            "contactInformation",
            "El correo electrónico de contacto debe tener al menos 5 caracteres",
        );
    }
}

struct FieldRule {
    field: &'static str,
    min: usize,
    message: &'static str,
}

const TEXT_RULES: [FieldRule; 7] = [
    FieldRule {
        field: "projectName",
        min: MIN_NAME_LENGTH,
        message: "El nombre del proyecto debe tener al menos 3 caracteres",
    },
    FieldRule {
        field: "location",
        min: MIN_NAME_LENGTH,
        message: "La ubicación debe tener al menos 3 caracteres",
    },
    FieldRule {
        field: "responsibleDepartment",
        min: MIN_NAME_LENGTH,
        message: "El departamento/carrera responsable debe tener al menos 3 caracteres",
    },
    FieldRule {
        field: "projectLead",
        min: MIN_PERSON_NAME_LENGTH,
        message: "El nombre del líder del proyecto (nombre y dos apellidos) debe tener al menos 5 caracteres.",
    },
    FieldRule {
        field: "academicTutor",
        min: MIN_PERSON_NAME_LENGTH,
        message: "El nombre del tutor académico (nombre y dos apellidos) debe tener al menos 5 caracteres.",
    },
    FieldRule {
        field: "communityTutor",
        min: MIN_PERSON_NAME_LENGTH,
        message: "El nombre del tutor comunitario (nombre y dos apellidos) debe tener al menos 5 caracteres.",
    },
    FieldRule {
        field: "description",
        min: MIN_DESCRIPTION_LENGTH,
        message: "La descripción debe tener al menos 10 caracteres",
    },
];

fn text_fields(patch: &ProjectPatch) -> [Option<&str>; 7] {
    [
        patch.project_name.as_deref(),
        patch.location.as_deref(),
        patch.responsible_department.as_deref(),
        patch.project_lead.as_deref(),
        patch.academic_tutor.as_deref(),
        patch.community_tutor.as_deref(),
        patch.description.as_deref(),
    ]
}

/// Validate a partial update: only the fields present are checked.
pub fn validate_patch(patch: &ProjectPatch) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for (rule, value) in TEXT_RULES.iter().zip(text_fields(patch)) {
        if let Some(value) = value {
            check_min_len(&mut errors, rule.field, value, rule.min, rule.message);
        }
    }
    if let Some(ref contact) = patch.contact_information {
        check_contact(&mut errors, contact);
    }

    errors.into_result()
}

/// Validate a full create payload, collecting every failing field.
pub fn validate_new_project(data: &NewProject) -> std::result::Result<(), ValidationErrors> {
    validate_patch(&ProjectPatch::from(data.clone()))
}
