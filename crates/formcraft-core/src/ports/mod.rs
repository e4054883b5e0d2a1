//! Hexagonal ports
//!
//! - `inbound`: use cases offered to the HTTP layer
//! - `outbound`: collaborators the core depends on (storage, text generation, events)

pub mod inbound;
pub mod outbound;
