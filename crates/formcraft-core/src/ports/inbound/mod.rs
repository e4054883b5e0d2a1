//! Inbound ports (use case traits)

use async_trait::async_trait;
use serde_json::Value;

use crate::application::dto::*;
use crate::builder::BuilderOp;
use crate::domain::aggregates::ResponseRecord;
use crate::domain::value_objects::{FormId, OwnerId};
use crate::error::Result;

/// Owner-scoped form lifecycle plus the public read path
#[async_trait]
pub trait FormUseCases: Send + Sync {
    /// Generate a definition from a prompt and persist it unpublished
    async fn create_from_prompt(&self, owner: &OwnerId, command: GenerateFormCommand) -> Result<FormView>;

    async fn get_form(&self, owner: &OwnerId, id: &FormId) -> Result<FormView>;

    /// Owner's forms with response counts, newest first
    async fn list_forms(&self, owner: &OwnerId) -> Result<Vec<FormSummary>>;

    /// Normalize and replace the stored definition (last writer wins)
    async fn save_definition(&self, owner: &OwnerId, id: &FormId, raw: &Value) -> Result<FormView>;

    async fn publish(&self, owner: &OwnerId, id: &FormId) -> Result<FormView>;

    async fn unpublish(&self, owner: &OwnerId, id: &FormId) -> Result<FormView>;

    async fn list_responses(&self, owner: &OwnerId, id: &FormId) -> Result<Vec<ResponseView>>;

    async fn dashboard_stats(&self, owner: &OwnerId) -> Result<DashboardStats>;

    /// Published definition and its rendering; no identity required
    async fn get_public_form(&self, id: &FormId) -> Result<PublicFormView>;
}

/// Public response submission
#[async_trait]
pub trait SubmissionUseCases: Send + Sync {
    async fn submit(&self, command: SubmitResponseCommand) -> Result<ResponseRecord>;
}

/// Interactive builder sessions
#[async_trait]
pub trait BuilderUseCases: Send + Sync {
    /// Open a session from the stored definition, or resume the caller's live one
    async fn open_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView>;

    async fn get_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView>;

    async fn apply_op(&self, owner: &OwnerId, id: &FormId, op: BuilderOp) -> Result<SessionView>;

    async fn undo(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView>;

    /// Persist the session's definition and clear its dirty flag
    async fn save_session(&self, owner: &OwnerId, id: &FormId) -> Result<SessionView>;

    /// Drop the session without saving
    async fn close_session(&self, owner: &OwnerId, id: &FormId) -> Result<()>;
}
