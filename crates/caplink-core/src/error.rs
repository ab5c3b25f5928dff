// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Caplink capability bridge.

use serde_json::{json, Value};
use thiserror::Error;

/// The primary error type used across Caplink traits and core operations.
#[derive(Debug, Error)]
pub enum CaplinkError {
    /// A caller passed a malformed or missing argument across a method channel.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Preference-store errors (database open, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Capability-plugin errors (collaborator failure, lifecycle side effect failed).
    #[error("plugin error: {message}")]
    Plugin {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CaplinkError {
    /// Short kind label for the wire form.
    fn kind(&self) -> &'static str {
        match self {
            CaplinkError::InvalidArgument(_) => "invalid-argument",
            CaplinkError::Config(_) => "config",
            CaplinkError::Store { .. } => "store",
            CaplinkError::Plugin { .. } => "plugin",
            CaplinkError::Internal(_) => "internal",
        }
    }

    /// Serialize this error into the map form reported across a method
    /// channel: `{type, message, cause}`, with `cause` taken from the
    /// underlying source error when one exists.
    pub fn to_wire(&self) -> Value {
        let cause = std::error::Error::source(self)
            .map(|s| json!({ "message": s.to_string() }))
            .unwrap_or(Value::Null);
        json!({
            "type": self.kind(),
            "message": self.to_string(),
            "cause": cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_carries_kind_and_message() {
        let err = CaplinkError::InvalidArgument("plugin name must be a string".into());
        let wire = err.to_wire();
        assert_eq!(wire["type"], "invalid-argument");
        assert_eq!(
            wire["message"],
            "invalid argument: plugin name must be a string"
        );
        assert!(wire["cause"].is_null());
    }

    #[test]
    fn wire_form_includes_cause_when_source_present() {
        let err = CaplinkError::Store {
            source: Box::new(std::io::Error::other("disk full")),
        };
        let wire = err.to_wire();
        assert_eq!(wire["type"], "store");
        assert_eq!(wire["cause"]["message"], "disk full");
    }

    #[test]
    fn plugin_variant_tolerates_missing_source() {
        let err = CaplinkError::Plugin {
            message: "sdk refused".into(),
            source: None,
        };
        assert_eq!(err.to_wire()["type"], "plugin");
        assert!(err.to_wire()["cause"].is_null());
    }
}
