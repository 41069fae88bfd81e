//! Actor identity with an explicit "unresolvable" sentinel.
//!
//! Historical records are not guaranteed to carry an actor id. Rather than
//! letting empty ids leak into deduplication (where they would silently
//! collide), the normalizer maps every missing or empty id to the reserved
//! [`UNKNOWN_ACTOR`] sentinel. Downstream consumers can test for it with
//! [`ActorId::is_unknown`] instead of string-matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved sentinel id for signals whose actor could not be determined.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Opaque actor identity. Never empty: construction coerces the empty
/// string to the [`UNKNOWN_ACTOR`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap a raw id, coercing empty input to the sentinel.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Self::unknown()
        } else {
            Self(raw)
        }
    }

    /// The reserved sentinel identity.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN_ACTOR.to_string())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the reserved sentinel identity.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_ACTOR
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
