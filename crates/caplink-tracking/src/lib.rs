// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracking-authorization capability plugin.
//!
//! Forwards `requestTracking` calls to the platform consent prompt (injected
//! as [`TrackingAuthorizer`]) and answers with the status wire string. A
//! platform without the prompt answers null.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use caplink_core::{
    CaplinkError, CapabilityPlugin, Messenger, MethodCall, MethodCallHandler, MethodResult,
    TrackingStatus,
};

/// Channel and plugin name for the tracking capability.
pub const TRACKING_CHANNEL: &str = "caplink.tracking";

/// The platform tracking-consent prompt behind the plugin.
#[async_trait]
pub trait TrackingAuthorizer: Send + Sync + 'static {
    /// Prompt the user (or read the recorded decision); `None` on platforms
    /// without a tracking-consent dialog.
    async fn request_authorization(&self) -> Option<TrackingStatus>;
}

/// Tracking-authorization capability plugin.
pub struct TrackingPlugin {
    messenger: Messenger,
    authorizer: Arc<dyn TrackingAuthorizer>,
}

impl TrackingPlugin {
    pub fn new(messenger: &Messenger, authorizer: Arc<dyn TrackingAuthorizer>) -> Self {
        Self {
            messenger: messenger.clone(),
            authorizer,
        }
    }
}

#[async_trait]
impl CapabilityPlugin for TrackingPlugin {
    fn name(&self) -> &str {
        TRACKING_CHANNEL
    }

    async fn enable(&self) -> Result<(), CaplinkError> {
        self.messenger.set_handler(
            TRACKING_CHANNEL,
            Arc::new(TrackingHandler {
                authorizer: Arc::clone(&self.authorizer),
            }),
        );
        Ok(())
    }

    async fn disable(&self) -> Result<(), CaplinkError> {
        self.messenger.clear_handler(TRACKING_CHANNEL);
        Ok(())
    }
}

struct TrackingHandler {
    authorizer: Arc<dyn TrackingAuthorizer>,
}

#[async_trait]
impl MethodCallHandler for TrackingHandler {
    async fn on_method_call(&self, call: MethodCall) -> MethodResult {
        match call.method.as_str() {
            "requestTracking" => match self.authorizer.request_authorization().await {
                Some(status) => MethodResult::success(json!(status.to_string())),
                None => MethodResult::success(Value::Null),
            },
            _ => MethodResult::NotImplemented,
        }
    }
}
