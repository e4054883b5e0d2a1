//! Data transfer objects

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::{BuilderSession, BuilderState};
use crate::domain::aggregates::{FormRecord, ResponseRecord};
use crate::domain::value_objects::{FormId, OwnerId, ResponseId};
use crate::schema::{display_value, render_form, FormDefinition, RenderedForm};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFormCommand {
    pub prompt: String,
    #[serde(default)]
    pub multi_step: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseCommand {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub responses: HashMap<String, Value>,
    pub submitter_email: Option<String>,
    pub submitter_name: Option<String>,
}

/// Owner's view of a stored form
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub id: FormId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub is_multi_step: bool,
    pub form: FormDefinition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&FormRecord> for FormView {
    fn from(record: &FormRecord) -> Self {
        Self {
            id: record.id().clone(),
            owner_id: record.owner_id().clone(),
            title: record.title().to_string(),
            description: record.description().to_string(),
            is_published: record.is_published(),
            is_multi_step: record.is_multi_step(),
            form: record.definition().clone(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    #[serde(flatten)]
    pub form: FormView,
    pub response_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_forms: u64,
    pub published_forms: u64,
    pub total_responses: u64,
}

/// One answer formatted for review
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub field_name: String,
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub id: ResponseId,
    pub form_id: FormId,
    pub response_data: HashMap<String, Value>,
    pub submitter_email: Option<String>,
    pub submitter_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Answers in form order, one per input field
    pub answers: Vec<AnswerView>,
}

impl ResponseView {
    pub fn new(definition: &FormDefinition, record: ResponseRecord) -> Self {
        let answers = definition
            .all_fields()
            .filter(|f| !f.field_type.is_structural())
            .map(|f| AnswerView {
                field_name: f.field_name.clone(),
                label: f.field_label.clone(),
                value: display_value(f, record.response_data.get(&f.field_name)),
            })
            .collect();
        Self {
            id: record.id,
            form_id: record.form_id,
            response_data: record.response_data,
            submitter_email: record.submitter_email,
            submitter_name: record.submitter_name,
            submitted_at: record.submitted_at,
            answers,
        }
    }
}

/// What the public fill page receives
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFormView {
    pub id: FormId,
    pub form: FormDefinition,
    pub rendered: RenderedForm,
}

impl From<&FormRecord> for PublicFormView {
    fn from(record: &FormRecord) -> Self {
        Self {
            id: record.id().clone(),
            form: record.definition().clone(),
            rendered: render_form(record.definition()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub form_id: FormId,
    pub state: BuilderState,
    pub dirty: bool,
    pub can_undo: bool,
}

impl SessionView {
    pub fn new(form_id: FormId, session: &BuilderSession) -> Self {
        Self {
            form_id,
            state: session.state().clone(),
            dirty: session.is_dirty(),
            can_undo: session.can_undo(),
        }
    }
}
