//! Newtype wrappers around backend-assigned string identifiers.
//!
//! Hosted document stores hand out opaque string ids, so the wrappers hold
//! a `String` rather than a UUID. Distinct types still prevent passing an
//! `ImageId` where a `FolderId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Maximum identifier length accepted by the hosted backend.
pub const MAX_ID_LENGTH: usize = 36;

/// Macro to define a newtype ID wrapper around `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, time-ordered identifier.
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate_id(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a folder document.
    FolderId
);
define_id!(
    /// Identifier of an image document.
    ImageId
);
define_id!(
    /// Identifier of a stored object inside the image bucket.
    ObjectKey
);

/// Generate a backend-compatible identifier (32 lowercase hex chars).
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Check an identifier against the hosted backend's rules: 1 to 36 chars
/// of `[a-zA-Z0-9._-]`, not starting with a special character.
pub fn validate_id(id: &str) -> Result<(), AppError> {
    if id.is_empty() || id.len() > MAX_ID_LENGTH {
        return Err(AppError::validation(format!(
            "Identifier must be 1 to {MAX_ID_LENGTH} characters"
        )));
    }
    if id.starts_with(['.', '-', '_']) {
        return Err(AppError::validation(
            "Identifier cannot start with a special character",
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(AppError::validation(format!(
            "Identifier '{id}' contains invalid characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = FolderId::generate();
        let b = FolderId::generate();
        assert_ne!(a, b);
        assert!(validate_id(a.as_str()).is_ok());
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!("".parse::<ImageId>().is_err());
        assert!("-leading".parse::<ImageId>().is_err());
        assert!("has space".parse::<ImageId>().is_err());
        assert!("a".repeat(37).parse::<ImageId>().is_err());
        assert!("project-images".parse::<ObjectKey>().is_ok());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = FolderId::new("f1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"f1\"");
    }
}
