// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Caplink capability bridge.
//!
//! This crate provides the foundational trait definitions, error types, the
//! method-call model, and the in-process messenger used throughout the
//! Caplink workspace. Capability plugins implement traits defined here.

pub mod error;
pub mod messenger;
pub mod method;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CaplinkError;
pub use messenger::{Messenger, MethodChannel, OutboundCall};
pub use method::{MethodCall, MethodError, MethodResult, INVALID_ARGUMENT_CODE};
pub use traits::{CapabilityPlugin, MethodCallHandler};
pub use types::{ChannelId, ConfigValue, TrackingStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_objects_are_constructible() {
        // Verifies both traits stay object-safe; this test won't compile
        // if a trait change breaks `dyn` usage.
        fn _assert_plugin(_: &dyn CapabilityPlugin) {}
        fn _assert_handler(_: &dyn MethodCallHandler) {}
    }

    #[test]
    fn caplink_error_has_all_variants() {
        let _invalid = CaplinkError::InvalidArgument("test".into());
        let _config = CaplinkError::Config("test".into());
        let _store = CaplinkError::Store {
            source: Box::new(std::io::Error::other("test")),
        };
        let _plugin = CaplinkError::Plugin {
            message: "test".into(),
            source: None,
        };
        let _internal = CaplinkError::Internal("test".into());
    }
}
