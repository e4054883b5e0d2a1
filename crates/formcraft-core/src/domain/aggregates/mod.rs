//! Aggregates

pub mod form;
pub mod response;

pub use form::FormRecord;
pub use response::ResponseRecord;
