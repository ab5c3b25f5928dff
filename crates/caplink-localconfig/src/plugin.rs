// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-config capability plugin.
//!
//! Bridges the preference store onto its method channel: typed set/reset
//! calls come inbound, and every successful mutation streams a fresh
//! `syncAll` snapshot outbound. Enabling installs the handler and starts
//! the sync task; disabling tears both down.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use caplink_core::{
    CaplinkError, CapabilityPlugin, Messenger, MethodCall, MethodCallHandler, MethodChannel,
    MethodError, MethodResult,
};

use crate::store::LocalConfigStore;

/// Channel and plugin name for the local-config capability.
pub const LOCAL_CONFIG_CHANNEL: &str = "caplink.local_config";

/// Code for store failures reported over the channel.
pub const LOCAL_CONFIG_ERROR_CODE: &str = "ELC000";

fn store_failure(err: CaplinkError) -> MethodResult {
    MethodResult::Failure(MethodError {
        code: LOCAL_CONFIG_ERROR_CODE.to_string(),
        message: None,
        details: Some(err.to_wire()),
    })
}

/// Preference-store capability plugin.
pub struct LocalConfigPlugin {
    messenger: Messenger,
    channel: MethodChannel,
    store: Arc<LocalConfigStore>,
    sync_task: Mutex<Option<JoinHandle<()>>>,
}

impl LocalConfigPlugin {
    pub fn new(messenger: &Messenger, store: Arc<LocalConfigStore>) -> Self {
        Self {
            messenger: messenger.clone(),
            channel: MethodChannel::new(messenger, LOCAL_CONFIG_CHANNEL),
            store,
            sync_task: Mutex::new(None),
        }
    }

    fn task_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.sync_task.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CapabilityPlugin for LocalConfigPlugin {
    fn name(&self) -> &str {
        LOCAL_CONFIG_CHANNEL
    }

    async fn enable(&self) -> Result<(), CaplinkError> {
        let mut slot = self.task_slot();
        if slot.is_some() {
            // Already enabled.
            return Ok(());
        }

        self.channel.set_handler(Arc::new(LocalConfigHandler {
            store: Arc::clone(&self.store),
        }));

        let store = Arc::clone(&self.store);
        let channel = MethodChannel::new(&self.messenger, LOCAL_CONFIG_CHANNEL);
        let mut revisions = store.subscribe();
        *slot = Some(tokio::spawn(async move {
            loop {
                match store.snapshot().await {
                    Ok(snapshot) => {
                        let args = serde_json::to_value(snapshot).unwrap_or(Value::Null);
                        channel.invoke("syncAll", args);
                    }
                    Err(err) => {
                        channel.invoke("error", err.to_wire());
                    }
                }
                if revisions.changed().await.is_err() {
                    break;
                }
            }
        }));
        debug!("local config plugin enabled");
        Ok(())
    }

    async fn disable(&self) -> Result<(), CaplinkError> {
        if let Some(task) = self.task_slot().take() {
            task.abort();
            debug!("local config plugin disabled");
        }
        self.channel.clear_handler();
        Ok(())
    }
}

struct LocalConfigHandler {
    store: Arc<LocalConfigStore>,
}

impl LocalConfigHandler {
    /// Parse a `[key, value]` argument pair.
    fn pair_args<'c>(call: &'c MethodCall) -> Option<(&'c str, &'c Value)> {
        let list = call.list_args()?;
        match list.as_slice() {
            [key, value] => Some((key.as_str()?, value)),
            _ => None,
        }
    }

    async fn set(&self, key: &str, value: caplink_core::ConfigValue) -> MethodResult {
        match self.store.set(key, value).await {
            Ok(()) => MethodResult::null(),
            Err(err) => store_failure(err),
        }
    }
}

#[async_trait]
impl MethodCallHandler for LocalConfigHandler {
    async fn on_method_call(&self, call: MethodCall) -> MethodResult {
        use caplink_core::ConfigValue;

        match call.method.as_str() {
            "setBool" => match Self::pair_args(&call).and_then(|(k, v)| Some((k, v.as_bool()?))) {
                Some((key, value)) => self.set(key, ConfigValue::Bool(value)).await,
                None => MethodResult::invalid_argument("setBool expects [key, bool]"),
            },
            "setInt" => match Self::pair_args(&call).and_then(|(k, v)| Some((k, v.as_i64()?))) {
                Some((key, value)) => self.set(key, ConfigValue::Int(value)).await,
                None => MethodResult::invalid_argument("setInt expects [key, int]"),
            },
            "setDouble" => match Self::pair_args(&call).and_then(|(k, v)| Some((k, v.as_f64()?))) {
                Some((key, value)) => self.set(key, ConfigValue::Double(value)).await,
                None => MethodResult::invalid_argument("setDouble expects [key, double]"),
            },
            "setString" => match Self::pair_args(&call).and_then(|(k, v)| Some((k, v.as_str()?))) {
                Some((key, value)) => self.set(key, ConfigValue::from(value)).await,
                None => MethodResult::invalid_argument("setString expects [key, string]"),
            },
            "setMany" => match call.map_args() {
                Some(map) => {
                    // Entries with unsupported value types are skipped, not errors.
                    let entries: Vec<(String, ConfigValue)> = map
                        .iter()
                        .filter_map(|(key, value)| {
                            serde_json::from_value(value.clone())
                                .ok()
                                .map(|v| (key.clone(), v))
                        })
                        .collect();
                    match self.store.set_many(entries).await {
                        Ok(()) => MethodResult::null(),
                        Err(err) => store_failure(err),
                    }
                }
                None => MethodResult::invalid_argument("setMany expects a map"),
            },
            "reset" => match call.str_arg() {
                Some(key) => match self.store.reset(key).await {
                    Ok(()) => MethodResult::null(),
                    Err(err) => store_failure(err),
                },
                None => MethodResult::invalid_argument("reset expects a string key"),
            },
            "resetMany" => {
                let keys: Option<Vec<String>> = call.list_args().map(|list| {
                    list.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                });
                match keys {
                    Some(keys) => match self.store.reset_many(keys).await {
                        Ok(()) => MethodResult::null(),
                        Err(err) => store_failure(err),
                    },
                    None => MethodResult::invalid_argument("resetMany expects a list of keys"),
                }
            }
            "resetAll" => match self.store.reset_all().await {
                Ok(()) => MethodResult::null(),
                Err(err) => store_failure(err),
            },
            _ => MethodResult::NotImplemented,
        }
    }
}
