//! Guard construction options.

use palisade_types::RESERVED_PREFIX;
use serde::{Deserialize, Serialize};

/// Options applied when installing guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOptions {
    /// Names starting with this prefix bypass every check.
    pub reserved_prefix: String,

    /// Whether grant and deny outcomes are logged at serving time.
    pub audit: bool,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            reserved_prefix: RESERVED_PREFIX.to_string(),
            audit: true,
        }
    }
}

impl GuardOptions {
    /// Disables audit logging (for testing).
    #[must_use]
    pub fn without_audit(mut self) -> Self {
        self.audit = false;
        self
    }

    #[must_use]
    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefix = prefix.into();
        self
    }

    /// Whether a field is exempt through its own or its type's name.
    pub fn is_exempt(&self, type_name: &str, field_name: &str) -> bool {
        palisade_types::is_reserved(field_name, &self.reserved_prefix)
            || palisade_types::is_reserved(type_name, &self.reserved_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Query", "__typename", true; "reserved field")]
    #[test_case("__Schema", "types", true; "reserved type")]
    #[test_case("Query", "health", false; "plain")]
    #[test_case("Query", "health_", false; "suffix only")]
    fn default_prefix(type_name: &str, field_name: &str, exempt: bool) {
        assert_eq!(GuardOptions::default().is_exempt(type_name, field_name), exempt);
    }

    #[test]
    fn custom_prefix() {
        let options = GuardOptions::default().with_reserved_prefix("internal");
        assert!(options.is_exempt("Query", "internalStats"));
        assert!(!options.is_exempt("Query", "_meta"));
    }
}
