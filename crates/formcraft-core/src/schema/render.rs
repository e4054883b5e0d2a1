//! Control plan for the public form-fill page and owner response review

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use super::model::{FieldContainer, FieldDefinition, FieldType, FormDefinition};
use super::registry::{resolve_field, RenderKind};

const DEFAULT_SUBMIT_LABEL: &str = "Submit";

/// Concrete input control for one field
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Control {
    #[serde(rename_all = "camelCase")]
    TextInput { input_type: &'static str },
    TextArea,
    Select { options: Vec<String> },
    RadioGroup { options: Vec<String> },
    CheckboxGroup { options: Vec<String> },
    Toggle { text: String },
    Date,
    Time,
    File,
    SignatureCanvas { initials: bool },
    SignatureText { initials: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub field_id: String,
    pub field_name: String,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub control: Control,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedStep {
    pub step_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<RenderedField>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedForm {
    pub title: String,
    pub subheading: String,
    pub is_multi_step: bool,
    pub steps: Vec<RenderedStep>,
    pub submit_label: String,
}

fn input_type(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Email | FieldType::SignerEmail => "email",
        FieldType::Tel | FieldType::Phone => "tel",
        FieldType::Url => "url",
        FieldType::Number => "number",
        FieldType::Password => "password",
        _ => "text",
    }
}

/// Build the control for one field; structural fields have none
pub fn render_field(field: &FieldDefinition) -> Option<RenderedField> {
    let initials = matches!(
        field.field_type,
        FieldType::Initial | FieldType::InitialTextbox
    );
    let control = match resolve_field(field) {
        RenderKind::Structural => return None,
        RenderKind::SingleLineText => Control::TextInput {
            input_type: input_type(&field.field_type),
        },
        RenderKind::MultiLineText => Control::TextArea,
        RenderKind::ChoiceSingle if field.field_type == FieldType::Radio => Control::RadioGroup {
            options: field.options.clone(),
        },
        RenderKind::ChoiceSingle => Control::Select {
            options: field.options.clone(),
        },
        RenderKind::ChoiceMulti => Control::CheckboxGroup {
            options: field.options.clone(),
        },
        RenderKind::Toggle => Control::Toggle {
            text: field
                .options
                .first()
                .cloned()
                .unwrap_or_else(|| field.field_label.clone()),
        },
        RenderKind::Date => Control::Date,
        RenderKind::Time => Control::Time,
        RenderKind::File => Control::File,
        RenderKind::SignatureCanvas => Control::SignatureCanvas { initials },
        RenderKind::SignatureText => Control::SignatureText { initials },
    };

    Some(RenderedField {
        field_id: field.field_id.clone(),
        field_name: field.field_name.clone(),
        label: field.field_label.clone(),
        placeholder: field.placeholder.clone(),
        required: field.required,
        control,
    })
}

fn render_fields(fields: &[FieldDefinition]) -> Vec<RenderedField> {
    fields.iter().filter_map(render_field).collect()
}

/// Render a whole form, steps in order
pub fn render_form(def: &FormDefinition) -> RenderedForm {
    let steps = match &def.container {
        FieldContainer::Flat(fields) => vec![RenderedStep {
            step_id: None,
            title: None,
            description: None,
            fields: render_fields(fields),
        }],
        FieldContainer::Stepped(steps) => steps
            .iter()
            .map(|step| RenderedStep {
                step_id: Some(step.step_id.clone()),
                title: Some(step.step_title.clone()),
                description: Some(step.step_description.clone()),
                fields: render_fields(&step.form_fields),
            })
            .collect(),
    };

    let submit_label = def
        .all_fields()
        .filter(|f| f.field_type.is_structural() && !f.field_label.trim().is_empty())
        .last()
        .map(|f| f.field_label.clone())
        .unwrap_or_else(|| DEFAULT_SUBMIT_LABEL.to_string());

    RenderedForm {
        title: def.form_title.clone(),
        subheading: def.form_subheading.clone(),
        is_multi_step: def.is_multi_step(),
        steps,
        submit_label,
    }
}

fn format_date(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%b %d, %Y").to_string())
}

/// Format a stored response value for owner review
pub fn display_value(field: &FieldDefinition, value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return "Not answered".into(),
        Some(Value::String(s)) if s.is_empty() => return "Not answered".into(),
        Some(Value::Array(items)) if items.is_empty() => return "Not answered".into(),
        Some(v) => v,
    };

    match (&field.field_type, value) {
        (FieldType::Signature | FieldType::Initial, _) => "Signed".into(),
        (FieldType::Date | FieldType::DateSigned, Value::String(s)) => {
            format_date(s).unwrap_or_else(|| s.clone())
        }
        (_, Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        (_, Value::Bool(true)) => "Yes".into(),
        (_, Value::Bool(false)) => "No".into(),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}
