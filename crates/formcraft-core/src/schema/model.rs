//! Form definition data model
//!
//! Pure value types. Every builder operation produces a new definition, so
//! these types are `Clone + PartialEq` and carry no behavior beyond
//! structural accessors.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use crate::error::FormsError;

/// Field type tag as it appears on the wire (`"text"`, `"signer-email"`, ...)
///
/// Unknown tags are preserved verbatim in `Other` so stored forms survive a
/// load/save cycle unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Password,
    Url,
    Number,
    Company,
    Title,
    Address,
    Phone,
    IdNumber,
    SignerName,
    SignerEmail,
    Textarea,
    Select,
    Dropdown,
    Radio,
    Checkbox,
    Agreement,
    Consent,
    Date,
    DateSigned,
    TimeSigned,
    File,
    Signature,
    Initial,
    TextSignature,
    EsignTextbox,
    InitialTextbox,
    Button,
    Other(String),
}

impl FieldType {
    /// Parse a wire tag; never fails
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "password" => Self::Password,
            "url" => Self::Url,
            "number" => Self::Number,
            "company" => Self::Company,
            "title" => Self::Title,
            "address" => Self::Address,
            "phone" => Self::Phone,
            "id-number" => Self::IdNumber,
            "signer-name" => Self::SignerName,
            "signer-email" => Self::SignerEmail,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "dropdown" => Self::Dropdown,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "agreement" => Self::Agreement,
            "consent" => Self::Consent,
            "date" => Self::Date,
            "date-signed" => Self::DateSigned,
            "time-signed" => Self::TimeSigned,
            "file" => Self::File,
            "signature" => Self::Signature,
            "initial" => Self::Initial,
            "text-signature" => Self::TextSignature,
            "esign-textbox" => Self::EsignTextbox,
            "initial-textbox" => Self::InitialTextbox,
            "button" => Self::Button,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Url => "url",
            Self::Number => "number",
            Self::Company => "company",
            Self::Title => "title",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::IdNumber => "id-number",
            Self::SignerName => "signer-name",
            Self::SignerEmail => "signer-email",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Agreement => "agreement",
            Self::Consent => "consent",
            Self::Date => "date",
            Self::DateSigned => "date-signed",
            Self::TimeSigned => "time-signed",
            Self::File => "file",
            Self::Signature => "signature",
            Self::Initial => "initial",
            Self::TextSignature => "text-signature",
            Self::EsignTextbox => "esign-textbox",
            Self::InitialTextbox => "initial-textbox",
            Self::Button => "button",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One form control
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique across every step of the form; never changes after creation
    pub field_id: String,
    pub field_type: FieldType,
    /// Response payload key, derived from the label once at creation
    pub field_name: String,
    pub field_label: String,
    pub placeholder: String,
    pub required: bool,
    /// Advisory rule tag (`email`, `phone`, `nonEmpty`, ...)
    pub validation: String,
    pub options: Vec<String>,
}

/// A named group of fields in a multi-step form
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub step_id: String,
    pub step_title: String,
    pub step_description: String,
    pub form_fields: Vec<FieldDefinition>,
}

/// The active field container of a form
#[derive(Clone, Debug, PartialEq)]
pub enum FieldContainer {
    Flat(Vec<FieldDefinition>),
    Stepped(Vec<StepDefinition>),
}

/// Root form schema
///
/// Serializes to the persisted JSON shape; deserializing runs the
/// normalizer, so anything loaded through serde is already validated.
#[derive(Clone, Debug, PartialEq)]
pub struct FormDefinition {
    pub form_title: String,
    pub form_subheading: String,
    pub container: FieldContainer,
}

impl FormDefinition {
    pub fn flat(
        form_title: impl Into<String>,
        form_subheading: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            form_title: form_title.into(),
            form_subheading: form_subheading.into(),
            container: FieldContainer::Flat(fields),
        }
    }

    pub fn stepped(
        form_title: impl Into<String>,
        form_subheading: impl Into<String>,
        steps: Vec<StepDefinition>,
    ) -> Self {
        Self {
            form_title: form_title.into(),
            form_subheading: form_subheading.into(),
            container: FieldContainer::Stepped(steps),
        }
    }

    pub fn is_multi_step(&self) -> bool {
        matches!(self.container, FieldContainer::Stepped(_))
    }

    /// Steps of a multi-step form; empty for a flat form
    pub fn steps(&self) -> &[StepDefinition] {
        match &self.container {
            FieldContainer::Stepped(steps) => steps,
            FieldContainer::Flat(_) => &[],
        }
    }

    /// Number of navigable steps; a flat form is one step
    pub fn step_count(&self) -> usize {
        match &self.container {
            FieldContainer::Flat(_) => 1,
            FieldContainer::Stepped(steps) => steps.len(),
        }
    }

    /// Fields of the container addressed by `step` (ignored for flat forms)
    pub fn active_fields(&self, step: usize) -> &[FieldDefinition] {
        match &self.container {
            FieldContainer::Flat(fields) => fields,
            FieldContainer::Stepped(steps) => steps
                .get(step)
                .map(|s| s.form_fields.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn active_fields_mut(&mut self, step: usize) -> Option<&mut Vec<FieldDefinition>> {
        match &mut self.container {
            FieldContainer::Flat(fields) => Some(fields),
            FieldContainer::Stepped(steps) => steps.get_mut(step).map(|s| &mut s.form_fields),
        }
    }

    /// Every field in form order, across all steps
    pub fn all_fields(&self) -> Box<dyn Iterator<Item = &FieldDefinition> + '_> {
        match &self.container {
            FieldContainer::Flat(fields) => Box::new(fields.iter()),
            FieldContainer::Stepped(steps) => {
                Box::new(steps.iter().flat_map(|s| s.form_fields.iter()))
            }
        }
    }

    pub fn find_field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.all_fields().find(|f| f.field_id == field_id)
    }

    /// Count of fields that accept input (structural fields excluded)
    pub fn input_field_count(&self) -> usize {
        self.all_fields()
            .filter(|f| !f.field_type.is_structural())
            .count()
    }

    /// Field names used by more than one input field
    pub fn duplicate_field_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for field in self.all_fields().filter(|f| !f.field_type.is_structural()) {
            if !seen.insert(field.field_name.as_str())
                && !duplicates.contains(&field.field_name)
            {
                duplicates.push(field.field_name.clone());
            }
        }
        duplicates
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormDefinitionWire<'a> {
    form_title: &'a str,
    form_subheading: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_multi_step: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [StepDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    form_fields: Option<&'a [FieldDefinition]>,
}

impl Serialize for FormDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match &self.container {
            FieldContainer::Flat(fields) => FormDefinitionWire {
                form_title: &self.form_title,
                form_subheading: &self.form_subheading,
                is_multi_step: None,
                total_steps: None,
                steps: None,
                form_fields: Some(fields),
            },
            FieldContainer::Stepped(steps) => FormDefinitionWire {
                form_title: &self.form_title,
                form_subheading: &self.form_subheading,
                is_multi_step: Some(true),
                total_steps: Some(steps.len()),
                steps: Some(steps),
                form_fields: None,
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FormDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        super::normalize::normalize(&raw).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<serde_json::Value> for FormDefinition {
    type Error = FormsError;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        super::normalize::normalize(&raw)
    }
}
