//! Generation adapter
//!
//! Prompt construction, model call with a timeout, JSON extraction and
//! normalization. Persisting the result is the caller's job.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{FormsError, Result};
use crate::ports::outbound::TextGenerator;
use crate::schema::ids::generate_field_id;
use crate::schema::{normalize, FieldContainer, FieldDefinition, FieldType, FormDefinition};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

const FIELD_TYPES: &str = "text, email, tel, password, url, number, textarea, select, radio, \
checkbox, date, file, signature, text-signature, esign-textbox, initial, initial-textbox, \
date-signed, time-signed, signer-name, signer-email, company, title, address, phone, id-number, \
agreement, consent, button";

const FIELD_SHAPE: &str = r#"{
      "fieldId": "unique_field_id",
      "fieldType": "one of the supported types",
      "fieldName": "snake_case_name",
      "fieldLabel": "Label shown to the user",
      "placeholder": "Helpful placeholder text",
      "required": true,
      "validation": "email | phone | number | date | nonEmpty | file | empty string",
      "options": ["only for select, radio, checkbox, agreement, consent"]
    }"#;

/// Build the single-step or multi-step instruction around the user's request
pub fn build_prompt(user_prompt: &str, multi_step: bool) -> String {
    let mut s = String::new();
    s.push_str("You are an expert form designer. Respond with ONLY a JSON object: ");
    s.push_str("no markdown, no commentary, parseable by a strict JSON parser.\n\n");
    s.push_str(&format!("User request: \"{user_prompt}\"\n\n"));
    s.push_str(&format!("Supported fieldType values: {FIELD_TYPES}.\n\n"));
    s.push_str("Rules:\n");
    s.push_str("- Every select, radio and checkbox field must have at least 3 options relevant to the request.\n");
    s.push_str("- Every fieldId must be unique across the whole form.\n");

    if multi_step {
        s.push_str("- Split the form into logical steps of related fields.\n");
        s.push_str("- The last field of the last step must be the submit button shown below.\n\n");
        s.push_str("Output format:\n");
        s.push_str(&format!(
            r#"{{
  "formTitle": "Form title",
  "formSubheading": "Short description",
  "isMultiStep": true,
  "totalSteps": 2,
  "steps": [
    {{
      "stepId": "step_1",
      "stepTitle": "Step title",
      "stepDescription": "What this step collects",
      "formFields": [
    {FIELD_SHAPE}
      ]
    }}
  ]
}}
"#
        ));
        s.push_str(&format!("Submit button field: {}\n", submit_button_json("Submit Form")));
    } else {
        s.push_str("- The last field must be the submit button shown below.\n\n");
        s.push_str("Output format:\n");
        s.push_str(&format!(
            r#"{{
  "formTitle": "Form title",
  "formSubheading": "Short description",
  "formFields": [
    {FIELD_SHAPE}
  ]
}}
"#
        ));
        s.push_str(&format!("Submit button field: {}\n", submit_button_json("Submit")));
    }
    s
}

fn submit_button_json(label: &str) -> String {
    serde_json::json!({
        "fieldId": "submit",
        "fieldType": "button",
        "fieldName": "submit",
        "fieldLabel": label,
        "placeholder": "",
        "required": false,
        "validation": "",
        "options": []
    })
    .to_string()
}

/// Strip markdown code fences a model may wrap its JSON in
pub fn clean_json_response(response: &str) -> &str {
    let mut cleaned = response.trim();
    if cleaned.starts_with("```") {
        cleaned = match cleaned.find('\n') {
            Some(idx) => &cleaned[idx + 1..],
            None => &cleaned[3..],
        };
        if let Some(stripped) = cleaned.trim_end().strip_suffix("```") {
            cleaned = stripped;
        }
    }
    cleaned.trim()
}

/// Append a submit button to the last container when the model left it out
fn ensure_submit_button(definition: &mut FormDefinition) {
    if definition.all_fields().any(|f| f.field_type.is_structural()) {
        return;
    }
    let multi_step = definition.is_multi_step();
    let field_id = if definition.find_field("submit").is_some() {
        generate_field_id()
    } else {
        "submit".to_string()
    };
    let button = FieldDefinition {
        field_id,
        field_type: FieldType::Button,
        field_name: "submit".into(),
        field_label: if multi_step { "Submit Form" } else { "Submit" }.into(),
        placeholder: String::new(),
        required: false,
        validation: String::new(),
        options: vec![],
    };
    match &mut definition.container {
        FieldContainer::Flat(fields) => fields.push(button),
        FieldContainer::Stepped(steps) => {
            if let Some(last) = steps.last_mut() {
                last.form_fields.push(button);
            }
        }
    }
}

/// Turns a natural-language request into a normalized form definition
pub struct FormGenerator {
    text: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl FormGenerator {
    pub fn new(text: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { text, timeout }
    }

    pub async fn generate(&self, user_prompt: &str, multi_step: bool) -> Result<FormDefinition> {
        let user_prompt = user_prompt.trim();
        if user_prompt.is_empty() {
            return Err(FormsError::invalid_input("Prompt is required"));
        }

        let prompt = build_prompt(user_prompt, multi_step);
        let raw = tokio::time::timeout(self.timeout, self.text.generate_text(&prompt))
            .await
            .map_err(|_| {
                warn!(timeout_secs = self.timeout.as_secs(), "Form generation timed out");
                FormsError::Generation(format!(
                    "model did not respond within {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                warn!(error = %e, "Text generator failed");
                FormsError::Generation(e.to_string())
            })?;

        let value: Value = serde_json::from_str(clean_json_response(&raw)).map_err(|e| {
            warn!(error = %e, "Model output was not valid JSON");
            FormsError::Generation(format!("model did not return valid JSON: {e}"))
        })?;

        let mut definition = normalize(&value)?;
        ensure_submit_button(&mut definition);

        info!(
            title = %definition.form_title,
            multi_step = definition.is_multi_step(),
            fields = definition.input_field_count(),
            "Generated form definition"
        );
        Ok(definition)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::outbound::GenerationError;
    use async_trait::async_trait;

    /// Returns a canned reply, optionally after a delay
    pub(crate) struct CannedGenerator {
        pub reply: std::result::Result<String, GenerationError>,
        pub delay: Duration,
    }

    impl CannedGenerator {
        pub(crate) fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_text(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone()
        }
    }

    pub(crate) const SIGNUP_REPLY: &str = r#"```json
{
  "formTitle": "Sign Up",
  "formSubheading": "Create your account",
  "formFields": [
    {"fieldId": "name", "fieldType": "text", "fieldName": "name", "fieldLabel": "Name", "placeholder": "Your name", "required": true, "validation": "nonEmpty", "options": []},
    {"fieldId": "email", "fieldType": "email", "fieldName": "email", "fieldLabel": "Email", "placeholder": "you@example.com", "required": true, "validation": "email", "options": []},
    {"fieldId": "password", "fieldType": "password", "fieldName": "password", "fieldLabel": "Password", "placeholder": "", "required": true, "validation": "", "options": []},
    {"fieldId": "submit", "fieldType": "button", "fieldName": "submit", "fieldLabel": "Submit", "placeholder": "", "required": false, "validation": "", "options": []}
  ]
}
```"#;

    fn generator(text: Arc<dyn TextGenerator>) -> FormGenerator {
        FormGenerator::new(text, Duration::from_secs(5))
    }

    #[test]
    fn test_prompt_modes() {
        let single = build_prompt("Create a signup form", false);
        assert!(single.contains("\"Create a signup form\""));
        assert!(single.contains("\"formFields\""));
        assert!(single.contains("at least 3 options"));
        assert!(!single.contains("\"isMultiStep\""));

        let multi = build_prompt("Job application", true);
        assert!(multi.contains("\"isMultiStep\": true"));
        assert!(multi.contains("Submit Form"));
    }

    #[test]
    fn test_clean_json_response() {
        assert_eq!(clean_json_response("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_json_response("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(clean_json_response("  {\"a\":1} "), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_signup_scenario() {
        let def = generator(CannedGenerator::ok(SIGNUP_REPLY))
            .generate("Create a signup form with name, email, and password", false)
            .await
            .unwrap();

        assert!(!def.is_multi_step());
        let fields = def.active_fields(0);
        let inputs: Vec<&FieldType> = fields
            .iter()
            .filter(|f| !f.field_type.is_structural())
            .map(|f| &f.field_type)
            .collect();
        assert!(inputs.len() >= 3);
        assert!(inputs.contains(&&FieldType::Text));
        assert!(inputs.contains(&&FieldType::Email));
        assert!(inputs.contains(&&FieldType::Password));
        assert_eq!(fields.iter().filter(|f| f.field_type == FieldType::Button).count(), 1);
        assert_eq!(fields.last().map(|f| &f.field_type), Some(&FieldType::Button));
    }

    #[tokio::test]
    async fn test_missing_button_appended_to_last_step() {
        let reply = r#"{"formTitle": "Apply", "isMultiStep": true, "steps": [
            {"stepTitle": "One", "formFields": [{"fieldType": "text", "fieldLabel": "Name"}]},
            {"stepTitle": "Two", "formFields": [{"fieldType": "email", "fieldLabel": "Email"}]}
        ]}"#;
        let def = generator(CannedGenerator::ok(reply))
            .generate("Job application", true)
            .await
            .unwrap();
        let last = def.steps()[1].form_fields.last().unwrap();
        assert_eq!(last.field_type, FieldType::Button);
        assert_eq!(last.field_label, "Submit Form");
        assert_eq!(def.steps()[0].form_fields.len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failures() {
        let err = generator(CannedGenerator::ok("Sure! Here is your form."))
            .generate("contact form", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::Generation(ref m) if m.contains("valid JSON")));

        let failing = Arc::new(CannedGenerator {
            reply: Err(GenerationError::Status {
                status: 429,
                body: "rate limited".into(),
            }),
            delay: Duration::ZERO,
        });
        let err = generator(failing).generate("contact form", false).await.unwrap_err();
        assert!(matches!(err, FormsError::Generation(ref m) if m.contains("429")));

        let err = generator(CannedGenerator::ok("{}"))
            .generate("contact form", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::SchemaShape(_)));

        let err = generator(CannedGenerator::ok(SIGNUP_REPLY))
            .generate("   ", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::InvalidInput(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout() {
        let slow = Arc::new(CannedGenerator {
            reply: Ok(SIGNUP_REPLY.to_string()),
            delay: Duration::from_secs(120),
        });
        let err = FormGenerator::new(slow, Duration::from_secs(1))
            .generate("contact form", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::Generation(ref m) if m.contains("within 1s")));
    }
}
