// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host configuration model and loader.
//!
//! Layered merge via Figment: compiled defaults, then `./caplink.toml`,
//! then `CAPLINK_*` environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub localconfig: LocalConfigSection,
    pub analytics: AnalyticsSection,
    pub push: PushSection,
}

/// `[localconfig]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfigSection {
    /// Path of the preference-store database file.
    pub database_path: String,
}

impl Default for LocalConfigSection {
    fn default() -> Self {
        Self {
            database_path: "caplink_local_config.db".to_string(),
        }
    }
}

/// `[analytics]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSection {
    /// Vendor app key; absent means analytics stays unconfigured.
    pub app_key: Option<String>,
}

/// `[push]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSection {
    /// Name of the platform push provider, if any.
    pub provider: Option<String>,
}

/// Load configuration from `./caplink.toml` with env var overrides.
pub fn load_config() -> Result<HostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HostConfig::default()))
        .merge(Toml::file("caplink.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from TOML content only, used in tests and embedders
/// that carry their own config source.
pub fn load_config_from_str(toml_content: &str) -> Result<HostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HostConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `Env::map` keeps underscore-containing key names unambiguous:
/// `CAPLINK_LOCALCONFIG_DATABASE_PATH` maps to `localconfig.database_path`.
fn env_provider() -> Env {
    Env::prefixed("CAPLINK_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("localconfig_", "localconfig.", 1)
            .replacen("analytics_", "analytics.", 1)
            .replacen("push_", "push.", 1);
        mapped.into()
    })
}
