//! Formcraft core
//!
//! AI-assisted form builder: users describe a form in natural language, a
//! text-generation model drafts a JSON schema, the builder edits it, and
//! published forms collect public responses.
//!
//! ## Architecture
//!
//! - **Schema**: form definition model, normalizer, field registry, renderer
//! - **Builder**: pure editing operations and explicit editing sessions
//! - **Validation**: per-field and per-step response checks
//! - **Domain**: form and response aggregates, value objects, domain events
//! - **Ports / Application / Infrastructure**: hexagonal use cases and adapters

pub mod application;
pub mod builder;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;
pub mod schema;
pub mod validation;

pub use application::{
    BuilderSessions, FormGenerator, FormService, SubmissionPolicy, SubmissionService,
};
pub use builder::{BuilderOp, BuilderSession, BuilderState, FieldPatch};
pub use domain::{DomainEvent, FormId, FormRecord, OwnerId, ResponseId, ResponseRecord};
pub use error::{FormsError, Result};
pub use ports::inbound::{BuilderUseCases, FormUseCases, SubmissionUseCases};
pub use ports::outbound::{
    EventPublisher, FormRepository, GenerationError, RepositoryError, ResponseRepository,
    TextGenerator,
};
pub use schema::{FieldDefinition, FieldType, FormDefinition, RenderKind, StepDefinition};
