// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-config capability plugin: a persistent key-value preference store
//! bridged over a method channel with full-snapshot change streaming.

pub mod plugin;
pub mod store;

pub use plugin::{LocalConfigPlugin, LOCAL_CONFIG_CHANNEL, LOCAL_CONFIG_ERROR_CODE};
pub use store::LocalConfigStore;
