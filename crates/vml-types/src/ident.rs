//! Identifier validation and typed identifier wrappers.
//!
//! Every identifier ends up embedded in a composite store key, either as
//! `{id}_{attribute}` or as a segment of a `##`-separated dimensional key.
//! Scans recover identifiers by splitting at the first `##`, so a valid
//! identifier:
//! - Must be non-empty
//! - Must not contain `#` (a trailing `#` could otherwise merge with the
//!   separator and move the split point)
//! - Must not contain control characters

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Character that is forbidden anywhere in an identifier.
pub const FORBIDDEN_CHAR: char = '#';

/// Validate a raw identifier of the given kind, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use vml_types::validate_identifier;
///
/// assert!(validate_identifier("product id", "P-100").is_ok());
/// assert!(validate_identifier("product id", "").is_err());
/// assert!(validate_identifier("product id", "P##1").is_err());
/// ```
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<(), TypeError> {
    if value.is_empty() {
        return Err(TypeError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: "must not be empty".into(),
        });
    }

    if value.contains(FORBIDDEN_CHAR) {
        return Err(TypeError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: format!("must not contain {FORBIDDEN_CHAR:?}"),
        });
    }

    if let Some(ch) = value.chars().find(|c| c.is_control()) {
        return Err(TypeError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: format!("contains control character {ch:?}"),
        });
    }

    Ok(())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Human-readable name of this identifier kind, used in errors.
            pub const KIND: &'static str = $kind;

            /// Validate and wrap a raw identifier.
            pub fn parse(value: impl Into<String>) -> Result<Self, TypeError> {
                let value = value.into();
                validate_identifier(Self::KIND, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// Name of a financial account (VMC, CSP or supplier).
    AccountName,
    "account name"
);

identifier!(
    /// Caller-supplied transaction identifier. Uniqueness is not enforced.
    TransactionId,
    "transaction id"
);

identifier!(
    /// Entity owning inventory and products (typically a vending machine).
    EntityId,
    "entity id"
);

identifier!(
    /// Slot or shelf position within an entity.
    LocationId,
    "location id"
);

identifier!(ProductId, "product id");

identifier!(
    /// Identifier of an activatable SIM identity.
    SimId,
    "SIM id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_identifier("x", "V").is_ok());
        assert!(validate_identifier("x", "vending-machine_01").is_ok());
        assert!(validate_identifier("x", "Coca Cola 33cl").is_ok());
        assert!(validate_identifier("x", "caf\u{e9}").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let err = validate_identifier("entity id", "").unwrap_err();
        assert!(matches!(err, TypeError::InvalidIdentifier { kind: "entity id", .. }));
    }

    #[test]
    fn rejects_separator_fragments() {
        assert!(validate_identifier("x", "a##b").is_err());
        assert!(validate_identifier("x", "trailing#").is_err());
        assert!(validate_identifier("x", "#leading").is_err());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(validate_identifier("x", "a\nb").is_err());
        assert!(validate_identifier("x", "tab\there").is_err());
    }

    #[test]
    fn parse_wraps_valid_value() {
        let id = ProductId::parse("P1").unwrap();
        assert_eq!(id.as_str(), "P1");
        assert_eq!(id.to_string(), "P1");
        assert_eq!(format!("{id:?}"), "ProductId(\"P1\")");
    }

    #[test]
    fn parse_reports_kind() {
        let err = LocationId::parse("L#1").unwrap_err();
        assert!(err.to_string().starts_with("invalid location id"));
    }

    #[test]
    fn from_str_matches_parse() {
        let id: EntityId = "E1".parse().unwrap();
        assert_eq!(id, EntityId::parse("E1").unwrap());
        assert!("".parse::<EntityId>().is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id = AccountName::parse("CSP-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CSP-1\"");
        let back: AccountName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<AccountName>("\"bad#name\"").is_err());
    }
}
