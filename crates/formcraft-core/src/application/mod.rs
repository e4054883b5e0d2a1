//! Application layer
//!
//! Use case orchestration over the domain and the outbound ports.

pub mod dto;
pub mod forms;
pub mod generation;
pub mod sessions;
pub mod submission;

pub use forms::FormService;
pub use generation::{FormGenerator, DEFAULT_GENERATION_TIMEOUT};
pub use sessions::BuilderSessions;
pub use submission::{SubmissionPolicy, SubmissionService};
