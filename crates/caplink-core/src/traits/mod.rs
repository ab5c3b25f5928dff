// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for capability plugins and method-call handlers.

pub mod handler;
pub mod plugin;

pub use handler::MethodCallHandler;
pub use plugin::CapabilityPlugin;
