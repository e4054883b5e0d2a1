//! Value objects
//!
//! Identifiers for forms, responses and owners.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FormsError, Result};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Form identifier (UUID v4 for new forms)
    FormId
);
string_id!(
    /// Response identifier
    ResponseId
);
string_id!(
    /// Opaque identity issued by the external identity provider
    OwnerId
);

impl FormId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Parse a caller-supplied id; blank ids are rejected
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FormsError::invalid_input("Form ID is required"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerId {
    /// Resolve the request identity; absent or blank means unauthenticated
    pub fn from_identity(identity: Option<&str>) -> Result<Self> {
        match identity.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(FormsError::Unauthenticated),
        }
    }
}
