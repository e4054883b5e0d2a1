//! Response submission pipeline

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::application::dto::SubmitResponseCommand;
use crate::domain::aggregates::ResponseRecord;
use crate::domain::value_objects::FormId;
use crate::error::{FormsError, Result};
use crate::ports::inbound::SubmissionUseCases;
use crate::ports::outbound::{EventPublisher, FormRepository, ResponseRepository};
use crate::validation::validate_form;

/// Server-side checks applied to submissions
///
/// By default the payload is stored verbatim once the publish gate passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmissionPolicy {
    /// Re-run the validation engine over every step before writing
    pub validate_payloads: bool,
}

pub struct SubmissionService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    policy: SubmissionPolicy,
}

impl SubmissionService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        responses: Arc<dyn ResponseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            forms,
            responses,
            event_publisher,
            policy,
        }
    }
}

#[async_trait]
impl SubmissionUseCases for SubmissionService {
    async fn submit(&self, command: SubmitResponseCommand) -> Result<ResponseRecord> {
        let form_id = FormId::parse(&command.form_id)?;
        if command.responses.is_empty() {
            return Err(FormsError::invalid_input("Response data is required"));
        }

        let form = self
            .forms
            .find_by_id(&form_id)
            .await?
            .ok_or(FormsError::NotFound)?;
        if !form.is_published() {
            warn!(form_id = %form_id, "Rejected submission to unpublished form");
            return Err(FormsError::NotPublished);
        }

        if self.policy.validate_payloads {
            let errors = validate_form(form.definition(), &command.responses);
            if !errors.is_empty() {
                warn!(form_id = %form_id, failed = errors.len(), "Rejected invalid submission");
                return Err(FormsError::Validation(errors));
            }
        }

        let response = ResponseRecord::create(
            form_id,
            command.responses,
            command.submitter_email,
            command.submitter_name,
        );
        self.responses.insert(&response).await?;

        if let Err(e) = self
            .event_publisher
            .publish(vec![response.submitted_event()])
            .await
        {
            warn!(error = %e, "Failed to publish domain events");
        }

        info!(form_id = %response.form_id, response_id = %response.id, "Response stored");
        Ok(response)
    }
}
