// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process messenger binding named method channels to one communication
//! surface.
//!
//! A [`Messenger`] models one engine instance: it routes inbound
//! [`MethodCall`]s to the handler attached for a channel name, and pushes
//! outbound invocations to the remote side through an unbounded queue.
//! Outbound delivery is fire-and-forget; a dropped receiver is logged and
//! otherwise ignored.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

use crate::method::{MethodCall, MethodResult};
use crate::traits::handler::MethodCallHandler;
use crate::types::ChannelId;

/// An outbound invocation pushed from the host side to the remote side.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    /// Identity of the surface the call originated on.
    pub channel_id: ChannelId,
    /// Channel name, e.g. `"caplink.local_config"`.
    pub channel: String,
    /// Method name, e.g. `"syncAll"`.
    pub method: String,
    /// Argument payload.
    pub args: Value,
}

struct MessengerInner {
    id: ChannelId,
    handlers: DashMap<String, Arc<dyn MethodCallHandler>>,
    outbound: mpsc::UnboundedSender<OutboundCall>,
}

/// One communication surface. Cheap to clone; clones share handlers,
/// identity, and the outbound queue.
#[derive(Clone)]
pub struct Messenger {
    inner: Arc<MessengerInner>,
}

impl Messenger {
    /// Create a messenger with a fresh [`ChannelId`] and return the
    /// receiving end of its outbound queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let messenger = Self {
            inner: Arc::new(MessengerInner {
                id: ChannelId::new(),
                handlers: DashMap::new(),
                outbound: tx,
            }),
        };
        (messenger, rx)
    }

    /// The identity of this surface.
    pub fn id(&self) -> ChannelId {
        self.inner.id
    }

    /// Attach `handler` for `channel`, replacing any prior handler.
    pub fn set_handler(&self, channel: &str, handler: Arc<dyn MethodCallHandler>) {
        self.inner.handlers.insert(channel.to_string(), handler);
    }

    /// Detach the handler for `channel`. No-op if none is attached.
    pub fn clear_handler(&self, channel: &str) {
        self.inner.handlers.remove(channel);
    }

    /// Route an inbound call to the handler attached for `channel`.
    pub async fn dispatch(&self, channel: &str, call: MethodCall) -> MethodResult {
        // Clone the Arc so the map guard is released before the await.
        let handler = self.inner.handlers.get(channel).map(|h| Arc::clone(&h));
        match handler {
            Some(handler) => handler.on_method_call(call).await,
            None => MethodResult::NotImplemented,
        }
    }

    /// Push an outbound invocation to the remote side, fire-and-forget.
    pub fn invoke(&self, channel: &str, method: &str, args: Value) {
        let call = OutboundCall {
            channel_id: self.inner.id,
            channel: channel.to_string(),
            method: method.to_string(),
            args,
        };
        if self.inner.outbound.send(call).is_err() {
            warn!(channel, method, "outbound receiver dropped, invoke ignored");
        }
    }
}

/// A named method channel bound to one messenger.
pub struct MethodChannel {
    name: String,
    messenger: Messenger,
}

impl MethodChannel {
    pub fn new(messenger: &Messenger, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messenger: messenger.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach `handler` to this channel, replacing any prior handler.
    pub fn set_handler(&self, handler: Arc<dyn MethodCallHandler>) {
        self.messenger.set_handler(&self.name, handler);
    }

    /// Detach this channel's handler.
    pub fn clear_handler(&self) {
        self.messenger.clear_handler(&self.name);
    }

    /// Invoke a method on the remote side of this channel.
    pub fn invoke(&self, method: &str, args: Value) {
        self.messenger.invoke(&self.name, method, args);
    }
}
