//! Outbound ports
//!
//! Interfaces that infrastructure adapters implement. Every write is a
//! standalone atomic unit; the core composes no cross-record transactions.

use async_trait::async_trait;

use crate::domain::aggregates::{FormRecord, ResponseRecord};
use crate::domain::value_objects::{FormId, OwnerId};
use crate::domain::DomainEvent;
use crate::error::FormsError;

/// Repository result type
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// Zero rows matched (missing row or ownership predicate failed)
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<RepositoryError> for FormsError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => FormsError::NotFound,
            other => FormsError::Storage(other.to_string()),
        }
    }
}

/// Form row store
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert a new form row
    async fn insert(&self, form: &FormRecord) -> RepoResult<()>;

    async fn find_by_id(&self, id: &FormId) -> RepoResult<Option<FormRecord>>;

    /// Update by id with an ownership predicate on the stored row
    async fn update_owned(&self, form: &FormRecord) -> RepoResult<()>;

    /// Owner's forms with their response counts (left join), newest first
    async fn find_by_owner_with_response_counts(
        &self,
        owner: &OwnerId,
    ) -> RepoResult<Vec<(FormRecord, u64)>>;

    async fn count_by_owner(&self, owner: &OwnerId) -> RepoResult<u64>;

    async fn count_published_by_owner(&self, owner: &OwnerId) -> RepoResult<u64>;
}

/// Response row store
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn insert(&self, response: &ResponseRecord) -> RepoResult<()>;

    /// Responses for a form, newest first
    async fn find_by_form(&self, form_id: &FormId) -> RepoResult<Vec<ResponseRecord>>;

    async fn count_by_form(&self, form_id: &FormId) -> RepoResult<u64>;

    /// Responses across every form owned by `owner`
    async fn count_by_owner(&self, owner: &OwnerId) -> RepoResult<u64>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>) -> RepoResult<()>;
}

/// Failures of the external text-generation collaborator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("no API key configured for the model provider")]
    MissingCredentials,
}

/// Black-box text generator: one prompt in, raw text out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}
