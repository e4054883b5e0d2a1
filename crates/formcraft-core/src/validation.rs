//! Validation engine
//!
//! Presence checks for required fields plus an email-shape check. Structural
//! fields are never validated and never appear in the error map.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::schema::{FieldDefinition, FormDefinition};

pub type StepErrors = BTreeMap<String, String>;

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Null, empty string, empty array and `false` count as unanswered
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

/// Validate one value; `None` means valid
pub fn validate_field(field: &FieldDefinition, value: Option<&Value>) -> Option<String> {
    if field.field_type.is_structural() {
        return None;
    }

    if is_empty_value(value) {
        return field
            .required
            .then(|| format!("{} is required", field.field_label));
    }

    if field.field_type.is_email() {
        let valid = matches!(
            (value, email_regex()),
            (Some(Value::String(s)), Some(re)) if re.is_match(s)
        );
        if !valid {
            return Some("Please enter a valid email address".into());
        }
    }

    None
}

/// Validate every input field of a step against the response map
pub fn validate_step(fields: &[FieldDefinition], responses: &HashMap<String, Value>) -> StepErrors {
    fields
        .iter()
        .filter(|f| !f.field_type.is_structural())
        .filter_map(|f| {
            validate_field(f, responses.get(&f.field_name)).map(|err| (f.field_name.clone(), err))
        })
        .collect()
}

/// Validate all steps of a form; the first error per field name wins
pub fn validate_form(def: &FormDefinition, responses: &HashMap<String, Value>) -> StepErrors {
    let mut errors = StepErrors::new();
    for step in 0..def.step_count() {
        for (name, err) in validate_step(def.active_fields(step), responses) {
            errors.entry(name).or_insert(err);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use proptest::prelude::*;
    use serde_json::json;

    fn field(field_type: FieldType, name: &str, required: bool) -> FieldDefinition {
        FieldDefinition {
            field_id: format!("id_{name}"),
            field_type,
            field_name: name.into(),
            field_label: name.to_uppercase(),
            placeholder: String::new(),
            required,
            validation: String::new(),
            options: vec![],
        }
    }

    #[test]
    fn test_required_messages() {
        let f = field(FieldType::Text, "name", true);
        assert_eq!(validate_field(&f, None), Some("NAME is required".into()));
        assert_eq!(validate_field(&f, Some(&json!(""))), Some("NAME is required".into()));
        assert_eq!(validate_field(&f, Some(&json!([]))), Some("NAME is required".into()));
        assert_eq!(validate_field(&f, Some(&json!("Ada"))), None);
        assert_eq!(validate_field(&f, Some(&json!(0))), None);
    }

    #[test]
    fn test_unchecked_required_agreement_fails() {
        let f = field(FieldType::Agreement, "terms", true);
        assert!(validate_field(&f, Some(&json!(false))).is_some());
        assert!(validate_field(&f, Some(&json!(true))).is_none());
    }

    #[test]
    fn test_email_shape() {
        let f = field(FieldType::SignerEmail, "email", false);
        assert_eq!(validate_field(&f, None), None);
        assert_eq!(
            validate_field(&f, Some(&json!("nope"))),
            Some("Please enter a valid email address".into())
        );
        assert_eq!(validate_field(&f, Some(&json!("a@b.co"))), None);
    }

    #[test]
    fn test_structural_skipped() {
        let f = field(FieldType::Button, "submit", true);
        assert_eq!(validate_field(&f, None), None);
        let errors = validate_step(&[f], &HashMap::new());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_step_only_reports_failures() {
        let fields = vec![
            field(FieldType::Text, "name", true),
            field(FieldType::Email, "email", true),
            field(FieldType::Textarea, "notes", false),
        ];
        let mut responses = HashMap::new();
        responses.insert("name".to_string(), json!("Ada"));
        responses.insert("email".to_string(), json!("bad"));
        let errors = validate_step(&fields, &responses);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], "Please enter a valid email address");
    }

    fn arb_field() -> impl Strategy<Value = FieldDefinition> {
        (
            prop::sample::select(vec![
                FieldType::Text,
                FieldType::Email,
                FieldType::Textarea,
                FieldType::Number,
                FieldType::Button,
            ]),
            any::<bool>(),
        )
            .prop_map(|(field_type, required)| field(field_type, "", required))
    }

    fn with_names(fields: Vec<FieldDefinition>) -> Vec<FieldDefinition> {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, mut f)| {
                f.field_name = format!("f{i}");
                f
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_missing_required_always_reported(fields in prop::collection::vec(arb_field(), 1..8)) {
            let fields = with_names(fields);
            let errors = validate_step(&fields, &HashMap::new());
            let required_inputs = fields
                .iter()
                .filter(|f| f.required && !f.field_type.is_structural())
                .count();
            prop_assert_eq!(errors.len(), required_inputs);
        }

        #[test]
        fn prop_populated_well_formed_passes(fields in prop::collection::vec(arb_field(), 1..8)) {
            let fields = with_names(fields);
            let responses: HashMap<String, Value> = fields
                .iter()
                .map(|f| {
                    let value = if f.field_type.is_email() { json!("user@example.com") } else { json!("value") };
                    (f.field_name.clone(), value)
                })
                .collect();
            prop_assert!(validate_step(&fields, &responses).is_empty());
        }
    }
}
