// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host side of the Caplink bridge.
//!
//! The host owns the plugin registry for a communication surface, services
//! remote `enablePlugin` / `disablePlugin` requests on the core channel,
//! registers default plugins, and loads configuration.

pub mod config;
pub mod host;

pub use config::{load_config, load_config_from_str, HostConfig};
pub use host::{HostCore, CORE_CHANNEL};
