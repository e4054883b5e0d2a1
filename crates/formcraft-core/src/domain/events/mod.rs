//! Domain events
//!
//! Raised by aggregates and handed to the event publisher after each write.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{FormId, OwnerId, ResponseId};

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Form(FormEvent),
    Response(ResponseEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    Created {
        form_id: FormId,
        owner_id: OwnerId,
        title: String,
        created_at: DateTime<Utc>,
    },

    DefinitionSaved {
        form_id: FormId,
        is_multi_step: bool,
        field_count: usize,
        saved_at: DateTime<Utc>,
    },

    Published {
        form_id: FormId,
        published_at: DateTime<Utc>,
    },

    Unpublished {
        form_id: FormId,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseEvent {
    Submitted {
        form_id: FormId,
        response_id: ResponseId,
        submitted_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Short stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Form(FormEvent::Created { .. }) => "form.created",
            Self::Form(FormEvent::DefinitionSaved { .. }) => "form.saved",
            Self::Form(FormEvent::Published { .. }) => "form.published",
            Self::Form(FormEvent::Unpublished { .. }) => "form.unpublished",
            Self::Response(ResponseEvent::Submitted { .. }) => "response.submitted",
        }
    }

    pub fn form_id(&self) -> &FormId {
        match self {
            Self::Form(FormEvent::Created { form_id, .. })
            | Self::Form(FormEvent::DefinitionSaved { form_id, .. })
            | Self::Form(FormEvent::Published { form_id, .. })
            | Self::Form(FormEvent::Unpublished { form_id })
            | Self::Response(ResponseEvent::Submitted { form_id, .. }) => form_id,
        }
    }
}
