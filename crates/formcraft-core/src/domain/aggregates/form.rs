//! Form aggregate
//!
//! Wraps a [`FormDefinition`] with ownership and lifecycle metadata. Title,
//! description and the multi-step flag are denormalized copies of the
//! definition and are re-synced on every definition change.

use chrono::{DateTime, Utc};

use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::value_objects::{FormId, OwnerId};
use crate::error::{FormsError, Result};
use crate::schema::FormDefinition;

#[derive(Clone, Debug)]
pub struct FormRecord {
    id: FormId,
    owner_id: OwnerId,
    title: String,
    description: String,
    definition: FormDefinition,
    is_published: bool,
    is_multi_step: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl FormRecord {
    /// Create a new unpublished form
    pub fn create(owner_id: OwnerId, definition: FormDefinition) -> Self {
        let now = Utc::now();
        let id = FormId::new();
        let mut form = Self {
            id: id.clone(),
            owner_id: owner_id.clone(),
            title: definition.form_title.clone(),
            description: definition.form_subheading.clone(),
            is_multi_step: definition.is_multi_step(),
            definition,
            is_published: false,
            created_at: now,
            updated_at: now,
            events: vec![],
        };
        let title = form.title.clone();
        form.raise_event(DomainEvent::Form(FormEvent::Created {
            form_id: id,
            owner_id,
            title,
            created_at: now,
        }));
        form
    }

    pub fn id(&self) -> &FormId {
        &self.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn is_multi_step(&self) -> bool {
        self.is_multi_step
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner_id == owner
    }

    /// Replace the definition and re-sync the denormalized columns
    pub fn replace_definition(&mut self, definition: FormDefinition) {
        self.title = definition.form_title.clone();
        self.description = definition.form_subheading.clone();
        self.is_multi_step = definition.is_multi_step();
        let field_count = definition.input_field_count();
        self.definition = definition;
        self.touch();
        self.raise_event(DomainEvent::Form(FormEvent::DefinitionSaved {
            form_id: self.id.clone(),
            is_multi_step: self.is_multi_step,
            field_count,
            saved_at: self.updated_at,
        }));
    }

    /// Open the form for public submissions
    ///
    /// Requires at least one input field across all steps. Publishing an
    /// already published form is a no-op.
    pub fn publish(&mut self) -> Result<()> {
        if self.definition.input_field_count() == 0 {
            return Err(FormsError::invalid_input(
                "Form must have at least one field before publishing",
            ));
        }
        if self.is_published {
            return Ok(());
        }
        self.is_published = true;
        self.touch();
        self.raise_event(DomainEvent::Form(FormEvent::Published {
            form_id: self.id.clone(),
            published_at: self.updated_at,
        }));
        Ok(())
    }

    pub fn unpublish(&mut self) {
        if !self.is_published {
            return;
        }
        self.is_published = false;
        self.touch();
        self.raise_event(DomainEvent::Form(FormEvent::Unpublished {
            form_id: self.id.clone(),
        }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDefinition, FieldType, StepDefinition};

    fn field(field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            field_id: format!("id_{field_type}"),
            field_type: field_type.clone(),
            field_name: field_type.to_string(),
            field_label: field_type.to_string(),
            placeholder: String::new(),
            required: false,
            validation: String::new(),
            options: vec![],
        }
    }

    fn owner() -> OwnerId {
        OwnerId::from_string("user_1")
    }

    #[test]
    fn test_create_raises_event_and_syncs_columns() {
        let mut form = FormRecord::create(
            owner(),
            FormDefinition::flat("Contact", "Reach us", vec![field(FieldType::Text)]),
        );
        assert_eq!(form.title(), "Contact");
        assert_eq!(form.description(), "Reach us");
        assert!(!form.is_published());
        let events = form.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "form.created");
        assert!(form.take_events().is_empty());
    }

    #[test]
    fn test_publish_requires_input_fields() {
        let mut form = FormRecord::create(
            owner(),
            FormDefinition::flat("Empty", "", vec![field(FieldType::Button)]),
        );
        assert!(matches!(form.publish(), Err(FormsError::InvalidInput(_))));
        assert!(!form.is_published());

        form.replace_definition(FormDefinition::stepped(
            "Steps",
            "",
            vec![StepDefinition {
                step_id: "step_1".into(),
                step_title: "Step 1".into(),
                step_description: String::new(),
                form_fields: vec![field(FieldType::Email)],
            }],
        ));
        assert!(form.is_multi_step());
        assert_eq!(form.title(), "Steps");
        form.publish().unwrap();
        assert!(form.is_published());
    }

    #[test]
    fn test_publish_and_unpublish_are_idempotent() {
        let mut form = FormRecord::create(
            owner(),
            FormDefinition::flat("Contact", "", vec![field(FieldType::Text)]),
        );
        form.take_events();
        form.publish().unwrap();
        form.publish().unwrap();
        assert_eq!(form.take_events().len(), 1);
        form.unpublish();
        form.unpublish();
        assert_eq!(form.take_events().len(), 1);
        assert!(!form.is_published());
    }
}
