//! Opaque identifier newtypes shared by the domain entities.
//!
//! Identifiers are opaque non-empty strings. Freshly created records receive
//! a UUID v4 string via `random()`, but lookups accept any identifier shape
//! so the ownership filters in the persistence layer remain the sole
//! authority on whether an id resolves to a row.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the identifier constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier is an empty string.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier carries surrounding whitespace.
    #[error("identifier must not contain surrounding whitespace")]
    Padded,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                if id.trim() != id {
                    return Err(IdValidationError::Padded);
                }
                Ok(Self(id))
            }

            /// Generate a fresh random identifier (UUID v4).
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_id! {
    /// Stable user identifier; the "owner" of customers and invoices.
    UserId
}

define_id! {
    /// Stable customer identifier.
    CustomerId
}

define_id! {
    /// Stable invoice identifier.
    InvoiceId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case(" u1", IdValidationError::Padded)]
    #[case("u1 ", IdValidationError::Padded)]
    fn rejects_malformed_identifiers(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(UserId::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn accepts_opaque_identifiers() {
        let id = CustomerId::new("c1").expect("valid id");
        assert_eq!(id.as_str(), "c1");
    }

    #[test]
    fn random_ids_are_distinct_uuids() {
        let a = InvoiceId::random();
        let b = InvoiceId::random();
        assert_ne!(a, b);
        Uuid::parse_str(a.as_str()).expect("uuid shaped");
    }

    #[test]
    fn serde_round_trips_through_string() {
        let id = UserId::new("u1").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialises");
        assert_eq!(json, "\"u1\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialises");
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_empty_identifier() {
        let result = serde_json::from_str::<UserId>("\"\"");
        assert!(result.is_err());
    }
}
