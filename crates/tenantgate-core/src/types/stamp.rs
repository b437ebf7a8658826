//! Opaque per-identity revocation nonce.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A security stamp. Changing it invalidates every credential signed against
/// the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stamp(String);

impl Stamp {
    /// Generates a fresh random stamp (128 bits, hex encoded).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an existing stamp value read from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the stamp as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_stamps_differ() {
        let a = Stamp::generate();
        let b = Stamp::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
