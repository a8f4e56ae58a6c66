//! Extension traits for serde_json::Value to reduce boilerplate in handlers.

use serde_json::Value;

/// Extension trait for convenient JSON value extraction with defaults.
pub trait ValueExt {
    /// Get a bool field or return default.
    fn bool_or(&self, key: &str, default: bool) -> bool;

    /// Get a string field, treating `null` and absence alike.
    fn opt_str(&self, key: &str) -> Option<&str>;
}

impl ValueExt for Value {
    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn opt_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }
}
