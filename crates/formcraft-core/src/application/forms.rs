//! Form lifecycle service

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::application::dto::*;
use crate::application::generation::FormGenerator;
use crate::domain::aggregates::FormRecord;
use crate::domain::value_objects::{FormId, OwnerId};
use crate::domain::DomainEvent;
use crate::error::{FormsError, Result};
use crate::ports::inbound::FormUseCases;
use crate::ports::outbound::{EventPublisher, FormRepository, ResponseRepository};
use crate::schema::normalize;

pub struct FormService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
    generator: Arc<FormGenerator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        responses: Arc<dyn ResponseRepository>,
        generator: Arc<FormGenerator>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            forms,
            responses,
            generator,
            event_publisher,
        }
    }

    /// Load a form the caller owns; someone else's form is reported as missing
    async fn load_owned(&self, owner: &OwnerId, id: &FormId) -> Result<FormRecord> {
        match self.forms.find_by_id(id).await? {
            Some(form) if form.is_owned_by(owner) => Ok(form),
            _ => Err(FormsError::NotFound),
        }
    }

    /// Persist a mutated form and publish what it raised; unchanged forms are not written
    async fn commit(&self, form: &mut FormRecord) -> Result<()> {
        let events = form.take_events();
        if events.is_empty() {
            return Ok(());
        }
        self.forms.update_owned(form).await?;
        self.publish_events(events).await;
        Ok(())
    }

    async fn publish_events(&self, events: Vec<DomainEvent>) {
        if let Err(e) = self.event_publisher.publish(events).await {
            warn!(error = %e, "Failed to publish domain events");
        }
    }
}

#[async_trait]
impl FormUseCases for FormService {
    async fn create_from_prompt(&self, owner: &OwnerId, command: GenerateFormCommand) -> Result<FormView> {
        let definition = self
            .generator
            .generate(&command.prompt, command.multi_step)
            .await?;

        let mut form = FormRecord::create(owner.clone(), definition);
        let events = form.take_events();
        self.forms.insert(&form).await?;
        self.publish_events(events).await;

        info!(form_id = %form.id(), owner = %owner, title = %form.title(), "Form created");
        Ok(FormView::from(&form))
    }

    async fn get_form(&self, owner: &OwnerId, id: &FormId) -> Result<FormView> {
        let form = self.load_owned(owner, id).await?;
        Ok(FormView::from(&form))
    }

    async fn list_forms(&self, owner: &OwnerId) -> Result<Vec<FormSummary>> {
        let rows = self.forms.find_by_owner_with_response_counts(owner).await?;
        Ok(rows
            .iter()
            .map(|(form, response_count)| FormSummary {
                form: FormView::from(form),
                response_count: *response_count,
            })
            .collect())
    }

    async fn save_definition(&self, owner: &OwnerId, id: &FormId, raw: &Value) -> Result<FormView> {
        let definition = normalize(raw)?;
        let mut form = self.load_owned(owner, id).await?;
        form.replace_definition(definition);
        self.commit(&mut form).await?;

        info!(form_id = %id, multi_step = form.is_multi_step(), "Form saved");
        Ok(FormView::from(&form))
    }

    async fn publish(&self, owner: &OwnerId, id: &FormId) -> Result<FormView> {
        let mut form = self.load_owned(owner, id).await?;
        form.publish()?;
        self.commit(&mut form).await?;

        info!(form_id = %id, "Form published");
        Ok(FormView::from(&form))
    }

    async fn unpublish(&self, owner: &OwnerId, id: &FormId) -> Result<FormView> {
        let mut form = self.load_owned(owner, id).await?;
        form.unpublish();
        self.commit(&mut form).await?;

        info!(form_id = %id, "Form unpublished");
        Ok(FormView::from(&form))
    }

    async fn list_responses(&self, owner: &OwnerId, id: &FormId) -> Result<Vec<ResponseView>> {
        let form = self.load_owned(owner, id).await?;
        let responses = self.responses.find_by_form(id).await?;
        Ok(responses
            .into_iter()
            .map(|r| ResponseView::new(form.definition(), r))
            .collect())
    }

    async fn dashboard_stats(&self, owner: &OwnerId) -> Result<DashboardStats> {
        // Three independent counts; no snapshot consistency between them
        Ok(DashboardStats {
            total_forms: self.forms.count_by_owner(owner).await?,
            published_forms: self.forms.count_published_by_owner(owner).await?,
            total_responses: self.responses.count_by_owner(owner).await?,
        })
    }

    async fn get_public_form(&self, id: &FormId) -> Result<PublicFormView> {
        let form = self.forms.find_by_id(id).await?.ok_or(FormsError::NotFound)?;
        if !form.is_published() {
            return Err(FormsError::NotPublished);
        }
        Ok(PublicFormView::from(&form))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::generation::tests::{CannedGenerator, SIGNUP_REPLY};
    use crate::infrastructure::{InMemoryFormStore, TracingEventPublisher};
    use serde_json::json;
    use std::time::Duration;

    pub(crate) fn service_with_store() -> (FormService, Arc<InMemoryFormStore>) {
        let store = Arc::new(InMemoryFormStore::new());
        let generator = Arc::new(FormGenerator::new(
            CannedGenerator::ok(SIGNUP_REPLY),
            Duration::from_secs(5),
        ));
        let service = FormService::new(
            store.clone(),
            store.clone(),
            generator,
            Arc::new(TracingEventPublisher),
        );
        (service, store)
    }

    fn alice() -> OwnerId {
        OwnerId::from_string("alice")
    }

    fn command() -> GenerateFormCommand {
        GenerateFormCommand {
            prompt: "Create a signup form with name, email, and password".into(),
            multi_step: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, _) = service_with_store();
        let created = service.create_from_prompt(&alice(), command()).await.unwrap();
        assert_eq!(created.title, "Sign Up");
        assert!(!created.is_published);

        let fetched = service.get_form(&alice(), &created.id).await.unwrap();
        assert_eq!(fetched.form, created.form);

        let stranger = OwnerId::from_string("mallory");
        assert_eq!(
            service.get_form(&stranger, &created.id).await,
            Err(FormsError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_save_definition_resyncs_columns() {
        let (service, _) = service_with_store();
        let created = service.create_from_prompt(&alice(), command()).await.unwrap();

        let raw = json!({
            "formTitle": "Registration",
            "formSubheading": "Updated",
            "isMultiStep": true,
            "steps": [{ "stepTitle": "One", "formFields": [{ "fieldType": "text", "fieldLabel": "Name" }] }]
        });
        let saved = service.save_definition(&alice(), &created.id, &raw).await.unwrap();
        assert_eq!(saved.title, "Registration");
        assert_eq!(saved.description, "Updated");
        assert!(saved.is_multi_step);
        assert!(saved.updated_at >= created.updated_at);

        let bad = service
            .save_definition(&alice(), &created.id, &json!({ "formTitle": "x" }))
            .await;
        assert!(matches!(bad, Err(FormsError::SchemaShape(_))));
    }

    #[tokio::test]
    async fn test_publish_lifecycle_and_public_view() {
        let (service, _) = service_with_store();
        let created = service.create_from_prompt(&alice(), command()).await.unwrap();

        assert_eq!(
            service.get_public_form(&created.id).await,
            Err(FormsError::NotPublished)
        );
        assert_eq!(
            service.get_public_form(&FormId::from_string("missing")).await,
            Err(FormsError::NotFound)
        );

        let published = service.publish(&alice(), &created.id).await.unwrap();
        assert!(published.is_published);
        assert!(service.publish(&alice(), &created.id).await.unwrap().is_published);

        let public = service.get_public_form(&created.id).await.unwrap();
        assert_eq!(public.rendered.steps[0].fields.len(), 3);

        let unpublished = service.unpublish(&alice(), &created.id).await.unwrap();
        assert!(!unpublished.is_published);
    }

    #[tokio::test]
    async fn test_publish_rejects_form_without_inputs() {
        let (service, _) = service_with_store();
        let created = service.create_from_prompt(&alice(), command()).await.unwrap();
        let raw = json!({ "formFields": [{ "fieldType": "button", "fieldLabel": "Submit" }] });
        service.save_definition(&alice(), &created.id, &raw).await.unwrap();
        assert!(matches!(
            service.publish(&alice(), &created.id).await,
            Err(FormsError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_list_forms_and_stats() {
        let (service, _) = service_with_store();
        let first = service.create_from_prompt(&alice(), command()).await.unwrap();
        let second = service.create_from_prompt(&alice(), command()).await.unwrap();
        service.publish(&alice(), &first.id).await.unwrap();
        service
            .create_from_prompt(&OwnerId::from_string("bob"), command())
            .await
            .unwrap();

        let forms = service.list_forms(&alice()).await.unwrap();
        assert_eq!(forms.len(), 2);
        assert!(forms[0].form.created_at >= forms[1].form.created_at);
        assert!(forms.iter().any(|f| f.form.id == second.id));
        assert!(forms.iter().all(|f| f.response_count == 0));

        let stats = service.dashboard_stats(&alice()).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_forms: 2,
                published_forms: 1,
                total_responses: 0
            }
        );
    }
}
