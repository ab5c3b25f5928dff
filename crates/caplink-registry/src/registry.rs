// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide registry of capability plugins, scoped by channel identity.
//!
//! The `PluginRegistry` stores one plugin per `(name, channel)` pair and
//! dispatches enable/disable lifecycle calls by name. Dispatch is best
//! effort: a miss is a silent no-op, and a plugin failure is logged and
//! swallowed. The registry's own contract never fails.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use caplink_core::{CapabilityPlugin, ChannelId};

/// Composite registration key: plugin name plus owning channel identity.
///
/// Same-named plugins registered under different channels are independent
/// entries; keying on the pair is what prevents cross-talk between surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RegistryKey {
    name: String,
    channel: ChannelId,
}

type Table = HashMap<RegistryKey, Arc<dyn CapabilityPlugin>>;

/// Registry of capability plugins, owned by the composition root.
///
/// Thread safe: the table is guarded by a single mutex, and every
/// insert/remove/lookup runs as one atomic unit. Lifecycle invocation
/// happens outside the lock on a clone taken under it, so a concurrently
/// unregistered plugin can never be looked up after removal.
pub struct PluginRegistry {
    entries: Mutex<Table>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    // A poisoned lock still holds a usable table; the registry never fails.
    fn table(&self) -> MutexGuard<'_, Table> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace the registration for `(plugin.name(), channel)`.
    ///
    /// Registering the same plugin again replaces the prior entry rather
    /// than duplicating it; subsequent lookups resolve to the latest plugin.
    pub fn register(&self, plugin: Arc<dyn CapabilityPlugin>, channel: ChannelId) {
        let key = RegistryKey {
            name: plugin.name().to_string(),
            channel,
        };
        debug!(plugin = %key.name, %channel, "plugin registered");
        self.table().insert(key, plugin);
    }

    /// Remove the registration matching `(plugin.name(), channel)`.
    /// No-op if absent.
    pub fn unregister(&self, plugin: &dyn CapabilityPlugin, channel: ChannelId) {
        self.unregister_name(plugin.name(), channel);
    }

    /// Remove the registration matching `(name, channel)`. No-op if absent.
    pub fn unregister_name(&self, name: &str, channel: ChannelId) {
        let key = RegistryKey {
            name: name.to_string(),
            channel,
        };
        if self.table().remove(&key).is_some() {
            debug!(plugin = name, %channel, "plugin unregistered");
        }
    }

    /// Drop every registration owned by `channel`.
    ///
    /// Called when a communication surface detaches; plugins are removed
    /// without invoking their lifecycle operations.
    pub fn detach_channel(&self, channel: ChannelId) {
        self.table().retain(|key, _| key.channel != channel);
        debug!(%channel, "channel detached from registry");
    }

    /// Invoke `enable` on the plugin registered under `(name, channel)`.
    ///
    /// A lookup miss is a silent no-op; a plugin failure is logged and
    /// swallowed.
    pub async fn enable(&self, name: &str, channel: ChannelId) {
        match self.lookup(name, channel) {
            Some(plugin) => {
                if let Err(err) = plugin.enable().await {
                    warn!(plugin = name, %channel, error = %err, "enable failed, ignored");
                }
            }
            None => debug!(plugin = name, %channel, "enable for unregistered plugin, ignored"),
        }
    }

    /// Invoke `disable` on the plugin registered under `(name, channel)`.
    /// Symmetric with [`enable`](Self::enable).
    pub async fn disable(&self, name: &str, channel: ChannelId) {
        match self.lookup(name, channel) {
            Some(plugin) => {
                if let Err(err) = plugin.disable().await {
                    warn!(plugin = name, %channel, error = %err, "disable failed, ignored");
                }
            }
            None => debug!(plugin = name, %channel, "disable for unregistered plugin, ignored"),
        }
    }

    /// True if a plugin is registered under `(name, channel)`.
    pub fn contains(&self, name: &str, channel: ChannelId) -> bool {
        let key = RegistryKey {
            name: name.to_string(),
            channel,
        };
        self.table().contains_key(&key)
    }

    /// Number of live registrations across all channels.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// True if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn lookup(&self, name: &str, channel: ChannelId) -> Option<Arc<dyn CapabilityPlugin>> {
        let key = RegistryKey {
            name: name.to_string(),
            channel,
        };
        // Clone the Arc under the lock so the guard is released before the
        // lifecycle call awaits.
        self.table().get(&key).cloned()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
