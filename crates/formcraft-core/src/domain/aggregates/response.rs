//! Response record: one immutable submission against a published form

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::events::{DomainEvent, ResponseEvent};
use crate::domain::value_objects::{FormId, ResponseId};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: ResponseId,
    pub form_id: FormId,
    /// Payload keyed by field name, stored verbatim
    pub response_data: HashMap<String, Value>,
    pub submitter_email: Option<String>,
    pub submitter_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn create(
        form_id: FormId,
        response_data: HashMap<String, Value>,
        submitter_email: Option<String>,
        submitter_name: Option<String>,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            form_id,
            response_data,
            submitter_email: submitter_email.filter(|e| !e.trim().is_empty()),
            submitter_name: submitter_name.filter(|n| !n.trim().is_empty()),
            submitted_at: Utc::now(),
        }
    }

    pub fn submitted_event(&self) -> DomainEvent {
        DomainEvent::Response(ResponseEvent::Submitted {
            form_id: self.form_id.clone(),
            response_id: self.id.clone(),
            submitted_at: self.submitted_at,
        })
    }
}
