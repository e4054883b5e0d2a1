//! Request middleware

pub mod identity;

pub use identity::{Identity, USER_ID_HEADER};
