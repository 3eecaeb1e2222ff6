//! Account identifier with `agr_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An Agora account identifier, always prefixed with `agr_`.
///
/// Accounts name proposers, voters, delegates, and action targets. The
/// engine trusts its caller for identity — key derivation and signature
/// checks live outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Account(String);

impl Account {
    /// The standard prefix for all Agora account identifiers.
    pub const PREFIX: &'static str = "agr_";

    /// Create a new account identifier from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `agr_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "account must start with agr_");
        Self(s)
    }

    /// Return the raw account string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this account identifier is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Account {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
