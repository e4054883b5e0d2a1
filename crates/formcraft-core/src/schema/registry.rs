//! Field registry
//!
//! The single table mapping a [`FieldType`] to how it renders, whether its
//! `options` are meaningful, and the template the builder palette inserts.

use serde::{Deserialize, Serialize};

use super::model::{FieldDefinition, FieldType};

/// Category of input control a field type maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    SingleLineText,
    MultiLineText,
    ChoiceSingle,
    ChoiceMulti,
    Toggle,
    Date,
    Time,
    File,
    SignatureCanvas,
    SignatureText,
    Structural,
}

/// Registry entry for one field type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTypeTraits {
    pub render_kind: RenderKind,
    pub options_applicable: bool,
}

impl FieldType {
    pub fn traits(&self) -> FieldTypeTraits {
        use RenderKind::*;
        let (render_kind, options_applicable) = match self {
            FieldType::Text
            | FieldType::Email
            | FieldType::Tel
            | FieldType::Password
            | FieldType::Url
            | FieldType::Number
            | FieldType::Company
            | FieldType::Title
            | FieldType::Address
            | FieldType::Phone
            | FieldType::IdNumber
            | FieldType::SignerName
            | FieldType::SignerEmail => (SingleLineText, false),
            FieldType::Textarea => (MultiLineText, false),
            FieldType::Select | FieldType::Dropdown | FieldType::Radio => (ChoiceSingle, true),
            // Multi-select by default; a checkbox with at most one option is a toggle
            FieldType::Checkbox => (ChoiceMulti, true),
            FieldType::Agreement | FieldType::Consent => (Toggle, true),
            FieldType::Date | FieldType::DateSigned => (Date, false),
            FieldType::TimeSigned => (Time, false),
            FieldType::File => (File, false),
            FieldType::Signature | FieldType::Initial => (SignatureCanvas, false),
            FieldType::TextSignature | FieldType::EsignTextbox | FieldType::InitialTextbox => {
                (SignatureText, false)
            }
            FieldType::Button => (Structural, false),
            FieldType::Other(_) => (SingleLineText, false),
        };
        FieldTypeTraits {
            render_kind,
            options_applicable,
        }
    }

    /// Submit buttons and other non-input markers
    pub fn is_structural(&self) -> bool {
        self.traits().render_kind == RenderKind::Structural
    }

    /// Types whose values get an email-shape check
    pub fn is_email(&self) -> bool {
        matches!(self, FieldType::Email | FieldType::SignerEmail)
    }
}

/// Resolve a wire tag to its render kind; unknown tags render as single-line text
pub fn resolve(field_type: &str) -> RenderKind {
    FieldType::from_tag(field_type).traits().render_kind
}

/// Resolve the render kind of a concrete field, taking its options into account
pub fn resolve_field(field: &FieldDefinition) -> RenderKind {
    match field.field_type {
        FieldType::Checkbox if field.options.len() <= 1 => RenderKind::Toggle,
        ref other => other.traits().render_kind,
    }
}

/// Whether the builder should show an options editor for this tag
pub fn options_applicable(field_type: &str) -> bool {
    FieldType::from_tag(field_type).traits().options_applicable
}

/// Source template for a new field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    pub field_type: FieldType,
    #[serde(default)]
    pub field_label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldTemplate {
    fn new(field_type: FieldType, label: &str) -> Self {
        Self {
            field_type,
            field_label: label.to_string(),
            placeholder: String::new(),
            required: false,
            validation: String::new(),
            options: Vec::new(),
        }
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn validation(mut self, rule: &str) -> Self {
        self.validation = rule.to_string();
        self
    }

    fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }
}

/// One palette entry shown in the builder sidebar
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub label: &'static str,
    pub template: FieldTemplate,
}

const DEFAULT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Default template for an insertable field type
///
/// Returns `None` for structural and unknown types.
pub fn default_template(field_type: &FieldType) -> Option<FieldTemplate> {
    use FieldType as T;
    let template = match field_type {
        T::Text => FieldTemplate::new(T::Text, "Text Field")
            .placeholder("Enter text...")
            .validation("nonEmpty"),
        T::Email => FieldTemplate::new(T::Email, "Email Address")
            .placeholder("Enter email...")
            .required()
            .validation("email"),
        T::Tel => FieldTemplate::new(T::Tel, "Phone Number")
            .placeholder("Enter phone number...")
            .validation("phone"),
        T::Password => FieldTemplate::new(T::Password, "Password").placeholder("Enter password..."),
        T::Url => FieldTemplate::new(T::Url, "Website").placeholder("https://"),
        T::Textarea => FieldTemplate::new(T::Textarea, "Message")
            .placeholder("Enter your message...")
            .validation("nonEmpty"),
        T::Select => FieldTemplate::new(T::Select, "Select Option")
            .placeholder("Choose an option...")
            .options(&DEFAULT_OPTIONS),
        T::Dropdown => FieldTemplate::new(T::Dropdown, "Select Option")
            .placeholder("Choose an option...")
            .options(&DEFAULT_OPTIONS),
        T::Radio => FieldTemplate::new(T::Radio, "Choose One").options(&DEFAULT_OPTIONS),
        T::Checkbox => FieldTemplate::new(T::Checkbox, "Select Multiple").options(&DEFAULT_OPTIONS),
        T::Number => FieldTemplate::new(T::Number, "Number")
            .placeholder("Enter number...")
            .validation("number"),
        T::Date => FieldTemplate::new(T::Date, "Date").validation("date"),
        T::File => FieldTemplate::new(T::File, "Upload File").validation("file"),
        T::Signature => FieldTemplate::new(T::Signature, "Digital Signature").required(),
        T::TextSignature => FieldTemplate::new(T::TextSignature, "Type Your Signature")
            .placeholder("Type your full name as signature")
            .required(),
        T::EsignTextbox => FieldTemplate::new(T::EsignTextbox, "Electronic Signature")
            .placeholder("Type your signature")
            .required(),
        T::Initial => FieldTemplate::new(T::Initial, "Initial Here"),
        T::InitialTextbox => FieldTemplate::new(T::InitialTextbox, "Type Your Initials")
            .placeholder("Enter initials"),
        T::DateSigned => FieldTemplate::new(T::DateSigned, "Date Signed").required(),
        T::TimeSigned => FieldTemplate::new(T::TimeSigned, "Time Signed"),
        T::SignerName => FieldTemplate::new(T::SignerName, "Full Name of Signer")
            .placeholder("Enter your full legal name")
            .required(),
        T::SignerEmail => FieldTemplate::new(T::SignerEmail, "Signer Email Address")
            .placeholder("Enter your email address")
            .required()
            .validation("email"),
        T::Company => FieldTemplate::new(T::Company, "Company/Organization")
            .placeholder("Enter company name"),
        T::Title => FieldTemplate::new(T::Title, "Title/Position").placeholder("Enter your title"),
        T::Address => FieldTemplate::new(T::Address, "Address").placeholder("Enter full address"),
        T::Phone => FieldTemplate::new(T::Phone, "Phone Number")
            .placeholder("Enter phone number")
            .validation("phone"),
        T::IdNumber => FieldTemplate::new(T::IdNumber, "ID/License Number")
            .placeholder("Enter ID or license number"),
        T::Agreement => FieldTemplate::new(T::Agreement, "I agree to the terms and conditions")
            .required()
            .options(&[
                "I agree to the terms and conditions and authorize this electronic signature",
            ]),
        T::Consent => FieldTemplate::new(T::Consent, "Electronic Signature Consent")
            .required()
            .options(&["I consent to use electronic signatures for this document"]),
        T::Button | T::Other(_) => return None,
    };
    Some(template)
}

/// The builder palette: basic inputs first, then the e-signature set
pub fn palette() -> Vec<PaletteEntry> {
    use FieldType as T;
    let entries: [(&'static str, FieldType); 27] = [
        ("Text Input", T::Text),
        ("Email", T::Email),
        ("Phone", T::Tel),
        ("Text Area", T::Textarea),
        ("Dropdown", T::Select),
        ("Radio Buttons", T::Radio),
        ("Checkboxes", T::Checkbox),
        ("Number", T::Number),
        ("Date", T::Date),
        ("File Upload", T::File),
        ("URL", T::Url),
        ("Password", T::Password),
        ("Signature", T::Signature),
        ("Text Signature", T::TextSignature),
        ("E-Sign Textbox", T::EsignTextbox),
        ("Initial", T::Initial),
        ("Initial Textbox", T::InitialTextbox),
        ("Date Signed", T::DateSigned),
        ("Time Signed", T::TimeSigned),
        ("Signer Name", T::SignerName),
        ("Signer Email", T::SignerEmail),
        ("Company", T::Company),
        ("Title", T::Title),
        ("Address", T::Address),
        ("ID Number", T::IdNumber),
        ("Agreement", T::Agreement),
        ("Consent", T::Consent),
    ];
    entries
        .into_iter()
        .filter_map(|(label, field_type)| {
            default_template(&field_type).map(|template| PaletteEntry { label, template })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve("email"), RenderKind::SingleLineText);
        assert_eq!(resolve("textarea"), RenderKind::MultiLineText);
        assert_eq!(resolve("radio"), RenderKind::ChoiceSingle);
        assert_eq!(resolve("consent"), RenderKind::Toggle);
        assert_eq!(resolve("date-signed"), RenderKind::Date);
        assert_eq!(resolve("time-signed"), RenderKind::Time);
        assert_eq!(resolve("initial"), RenderKind::SignatureCanvas);
        assert_eq!(resolve("initial-textbox"), RenderKind::SignatureText);
        assert_eq!(resolve("button"), RenderKind::Structural);
        assert_eq!(resolve("hologram"), RenderKind::SingleLineText);
    }

    #[test]
    fn test_checkbox_option_count_decides_kind() {
        let mut template = default_template(&FieldType::Checkbox).unwrap();
        let mut field = FieldDefinition {
            field_id: "c".into(),
            field_type: template.field_type.clone(),
            field_name: "c".into(),
            field_label: template.field_label.clone(),
            placeholder: String::new(),
            required: false,
            validation: String::new(),
            options: std::mem::take(&mut template.options),
        };
        assert_eq!(resolve_field(&field), RenderKind::ChoiceMulti);
        field.options.truncate(1);
        assert_eq!(resolve_field(&field), RenderKind::Toggle);
    }

    #[test]
    fn test_options_applicable() {
        assert!(options_applicable("select"));
        assert!(options_applicable("checkbox"));
        assert!(!options_applicable("text"));
        assert!(!options_applicable("unknown-type"));
    }

    #[test]
    fn test_palette_defaults() {
        let palette = palette();
        assert_eq!(palette.len(), 27);
        let email = palette
            .iter()
            .find(|e| e.template.field_type == FieldType::Email)
            .unwrap();
        assert!(email.template.required);
        assert_eq!(email.template.validation, "email");
        let select = palette
            .iter()
            .find(|e| e.template.field_type == FieldType::Select)
            .unwrap();
        assert_eq!(select.template.options.len(), 3);
        assert!(palette.iter().all(|e| !e.template.field_type.is_structural()));
    }

    #[test]
    fn test_no_template_for_button() {
        assert!(default_template(&FieldType::Button).is_none());
        assert!(default_template(&FieldType::Other("x".into())).is_none());
    }
}
