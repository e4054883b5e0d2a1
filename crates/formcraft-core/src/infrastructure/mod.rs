//! Infrastructure adapters for the outbound ports

pub mod events;
pub mod llm;
pub mod persistence;

pub use events::TracingEventPublisher;
pub use llm::HttpTextGenerator;
pub use persistence::InMemoryFormStore;
