//! Schema validator and normalizer
//!
//! Turns untrusted JSON (model output, stored rows, builder saves) into a
//! [`FormDefinition`]. Field-level problems fail the whole document.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use super::ids::{derive_field_name, generate_field_id, step_id_for};
use super::model::{FieldContainer, FieldDefinition, FieldType, FormDefinition, StepDefinition};
use crate::error::{FormsError, Result};

pub const DEFAULT_FORM_TITLE: &str = "Untitled Form";

/// Validate and normalize a raw form document
pub fn normalize(raw: &Value) -> Result<FormDefinition> {
    let root = raw
        .as_object()
        .ok_or_else(|| FormsError::SchemaShape("form definition must be a JSON object".into()))?;

    let form_title = root_string(root, "formTitle")?.unwrap_or_else(|| DEFAULT_FORM_TITLE.into());
    let form_subheading = root_string(root, "formSubheading")?.unwrap_or_default();
    let multi_step_flag = match root.get("isMultiStep") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err(FormsError::SchemaShape("isMultiStep must be a boolean".into())),
    };

    let fields = root_array(root, "formFields")?;
    let steps = root_array(root, "steps")?;
    let has_fields = fields.map_or(false, |f| !f.is_empty());
    let has_steps = steps.map_or(false, |s| !s.is_empty());

    let mut seen_ids = HashSet::new();
    let container = match (fields, steps) {
        (None, None) => {
            return Err(FormsError::SchemaShape(
                "one of formFields or steps is required".into(),
            ))
        }
        _ if has_fields && has_steps => {
            return Err(FormsError::SchemaShape(
                "formFields and steps cannot both be populated".into(),
            ))
        }
        (_, Some(steps)) if has_steps => {
            FieldContainer::Stepped(parse_steps(steps, &mut seen_ids)?)
        }
        (Some(fields), _) if has_fields => {
            if multi_step_flag {
                return Err(FormsError::SchemaShape(
                    "isMultiStep is set but steps is empty".into(),
                ));
            }
            FieldContainer::Flat(parse_fields(fields, "formFields", &mut seen_ids)?)
        }
        _ if multi_step_flag => {
            return Err(FormsError::SchemaShape(
                "isMultiStep is set but steps is empty".into(),
            ))
        }
        _ => FieldContainer::Flat(Vec::new()),
    };

    let definition = FormDefinition {
        form_title,
        form_subheading,
        container,
    };

    let duplicates = definition.duplicate_field_names();
    if !duplicates.is_empty() {
        warn!(
            form_title = %definition.form_title,
            duplicates = ?duplicates,
            "Form definition has duplicate field names"
        );
    }

    Ok(definition)
}

fn root_string(root: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FormsError::SchemaShape(format!("{key} must be a string"))),
    }
}

fn root_array<'a>(root: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(FormsError::SchemaShape(format!("{key} must be an array"))),
    }
}

fn parse_steps(raw: &[Value], seen_ids: &mut HashSet<String>) -> Result<Vec<StepDefinition>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let path = format!("steps[{index}]");
            let obj = value
                .as_object()
                .ok_or_else(|| FormsError::schema_field(&path, "step must be an object"))?;

            let step_id = non_empty(string_attr(obj, "stepId", &path)?)
                .unwrap_or_else(|| step_id_for(index));
            let step_title = non_empty(string_attr(obj, "stepTitle", &path)?)
                .unwrap_or_else(|| format!("Step {}", index + 1));
            let step_description = string_attr(obj, "stepDescription", &path)?.unwrap_or_default();

            let fields_path = format!("{path}.formFields");
            let form_fields = match obj.get("formFields") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => parse_fields(items, &fields_path, seen_ids)?,
                Some(_) => {
                    return Err(FormsError::schema_field(fields_path, "formFields must be an array"))
                }
            };

            Ok(StepDefinition {
                step_id,
                step_title,
                step_description,
                form_fields,
            })
        })
        .collect()
}

fn parse_fields(
    raw: &[Value],
    container_path: &str,
    seen_ids: &mut HashSet<String>,
) -> Result<Vec<FieldDefinition>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let path = format!("{container_path}[{index}]");
            let field = parse_field(value, &path)?;
            if !seen_ids.insert(field.field_id.clone()) {
                return Err(FormsError::schema_field(
                    path,
                    format!("duplicate fieldId '{}'", field.field_id),
                ));
            }
            Ok(field)
        })
        .collect()
}

fn parse_field(value: &Value, path: &str) -> Result<FieldDefinition> {
    let obj = value
        .as_object()
        .ok_or_else(|| FormsError::schema_field(path, "field must be an object"))?;

    let field_type = non_empty(string_attr(obj, "fieldType", path)?)
        .map(|tag| FieldType::from_tag(&tag))
        .ok_or_else(|| FormsError::schema_field(path, "fieldType is required"))?;

    let field_id = non_empty(string_attr(obj, "fieldId", path)?).unwrap_or_else(generate_field_id);
    let field_label = string_attr(obj, "fieldLabel", path)?.unwrap_or_default();
    let field_name = non_empty(string_attr(obj, "fieldName", path)?)
        .or_else(|| non_empty(Some(derive_field_name(&field_label))))
        .unwrap_or_else(|| field_id.clone());

    let required = match obj.get("required") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err(FormsError::schema_field(path, "required must be a boolean")),
    };

    let options = match obj.get("options") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                _ => Err(FormsError::schema_field(path, "options must be strings")),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(FormsError::schema_field(path, "options must be an array")),
    };

    Ok(FieldDefinition {
        field_id,
        field_type,
        field_name,
        field_label,
        placeholder: string_attr(obj, "placeholder", path)?.unwrap_or_default(),
        required,
        validation: string_attr(obj, "validation", path)?.unwrap_or_default(),
        options,
    })
}

fn string_attr(obj: &Map<String, Value>, key: &str, path: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FormsError::schema_field(path, format!("{key} must be a string"))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
