// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Caplink bridge.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identity of one communication surface (engine instance).
///
/// Every [`Messenger`](crate::messenger::Messenger) owns a distinct
/// `ChannelId`; registrations in the plugin registry are scoped by it so
/// that same-named plugins on different surfaces never cross-talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(uuid::Uuid);

impl ChannelId {
    /// Generate a fresh, process-unique channel identity.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a tracking-authorization prompt.
///
/// Display/FromStr use the wire strings the remote layer expects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TrackingStatus {
    #[strum(serialize = "authorized")]
    #[serde(rename = "authorized")]
    Authorized,
    #[strum(serialize = "denied")]
    #[serde(rename = "denied")]
    Denied,
    #[strum(serialize = "notDetermined")]
    #[serde(rename = "notDetermined")]
    NotDetermined,
    #[strum(serialize = "restricted")]
    #[serde(rename = "restricted")]
    Restricted,
}

/// A typed value accepted by the local preference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Double(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Text(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn channel_ids_are_unique() {
        let a = ChannelId::new();
        let b = ChannelId::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn tracking_status_wire_strings_round_trip() {
        let cases = [
            (TrackingStatus::Authorized, "authorized"),
            (TrackingStatus::Denied, "denied"),
            (TrackingStatus::NotDetermined, "notDetermined"),
            (TrackingStatus::Restricted, "restricted"),
        ];
        for (status, wire) in cases {
            assert_eq!(status.to_string(), wire);
            assert_eq!(TrackingStatus::from_str(wire).unwrap(), status);
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(wire.to_string())
            );
        }
    }

    #[test]
    fn config_value_untagged_serialization() {
        assert_eq!(
            serde_json::to_value(ConfigValue::Bool(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(ConfigValue::Int(42)).unwrap(),
            serde_json::json!(42)
        );
        assert_eq!(
            serde_json::to_value(ConfigValue::Double(1.5)).unwrap(),
            serde_json::json!(1.5)
        );
        assert_eq!(
            serde_json::to_value(ConfigValue::Text("x".into())).unwrap(),
            serde_json::json!("x")
        );

        let parsed: ConfigValue = serde_json::from_value(serde_json::json!(7)).unwrap();
        assert_eq!(parsed, ConfigValue::Int(7));
        let parsed: ConfigValue = serde_json::from_value(serde_json::json!(7.25)).unwrap();
        assert_eq!(parsed, ConfigValue::Double(7.25));
    }
}
