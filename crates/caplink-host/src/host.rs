// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel owner servicing remote lifecycle calls.
//!
//! `HostCore` attaches to one messenger, installs itself on the core method
//! channel, and translates `enablePlugin` / `disablePlugin` requests into
//! registry dispatch scoped to that messenger's identity. A malformed plugin
//! name is rejected at this boundary with a coded failure; the registry is
//! never consulted for it.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use caplink_core::{
    CaplinkError, Messenger, MethodCall, MethodCallHandler, MethodResult,
};
use caplink_localconfig::{LocalConfigPlugin, LocalConfigStore};
use caplink_registry::PluginRegistry;
use caplink_tracking::TrackingAuthorizer;

use crate::config::HostConfig;

/// Name of the core method channel.
pub const CORE_CHANNEL: &str = "caplink.core";

/// The channel owner for one communication surface.
pub struct HostCore {
    messenger: Messenger,
    registry: Arc<PluginRegistry>,
    tracking: Option<Arc<dyn TrackingAuthorizer>>,
}

impl HostCore {
    /// Attach to `messenger`: installs the returned host as the core-channel
    /// handler. Registrations for this surface are scoped by
    /// `messenger.id()`.
    pub fn attach(
        messenger: &Messenger,
        registry: Arc<PluginRegistry>,
        tracking: Option<Arc<dyn TrackingAuthorizer>>,
    ) -> Arc<Self> {
        let host = Arc::new(Self {
            messenger: messenger.clone(),
            registry,
            tracking,
        });
        messenger.set_handler(CORE_CHANNEL, host.clone());
        debug!(channel = %messenger.id(), "host core attached");
        host
    }

    /// Attach and register the default plugins: opens the preference store
    /// at the configured path and registers the local-config plugin.
    pub async fn attach_with_defaults(
        messenger: &Messenger,
        registry: Arc<PluginRegistry>,
        config: &HostConfig,
        tracking: Option<Arc<dyn TrackingAuthorizer>>,
    ) -> Result<Arc<Self>, CaplinkError> {
        let store = LocalConfigStore::open(Path::new(&config.localconfig.database_path)).await?;
        let plugin = Arc::new(LocalConfigPlugin::new(messenger, Arc::new(store)));
        registry.register(plugin, messenger.id());
        Ok(Self::attach(messenger, registry, tracking))
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Detach from the surface: clears the core handler and drops every
    /// registration owned by this messenger.
    pub fn detach(&self) {
        self.messenger.clear_handler(CORE_CHANNEL);
        self.registry.detach_channel(self.messenger.id());
        debug!(channel = %self.messenger.id(), "host core detached");
    }
}

#[async_trait]
impl MethodCallHandler for HostCore {
    async fn on_method_call(&self, call: MethodCall) -> MethodResult {
        match call.method.as_str() {
            "enablePlugin" => match call.str_arg() {
                Some(name) => {
                    self.registry.enable(name, self.messenger.id()).await;
                    MethodResult::null()
                }
                None => {
                    MethodResult::invalid_argument("Invalid plugin name passed to enablePlugin")
                }
            },
            "disablePlugin" => match call.str_arg() {
                Some(name) => {
                    self.registry.disable(name, self.messenger.id()).await;
                    MethodResult::null()
                }
                None => {
                    MethodResult::invalid_argument("Invalid plugin name passed to disablePlugin")
                }
            },
            "Permissions:requestTracking" => match &self.tracking {
                Some(authorizer) => match authorizer.request_authorization().await {
                    Some(status) => MethodResult::success(json!(status.to_string())),
                    None => MethodResult::success(Value::Null),
                },
                None => MethodResult::success(Value::Null),
            },
            _ => MethodResult::NotImplemented,
        }
    }
}
