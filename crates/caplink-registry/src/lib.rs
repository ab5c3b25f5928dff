// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-scoped capability-plugin registry.
//!
//! The registry maps `(plugin name, channel identity)` to a capability
//! plugin and dispatches best-effort enable/disable lifecycle calls. See
//! [`registry::PluginRegistry`] for the contract.

pub mod registry;

pub use registry::PluginRegistry;
