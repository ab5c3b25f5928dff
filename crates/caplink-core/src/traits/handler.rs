// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler trait for inbound method calls on a channel.

use async_trait::async_trait;

use crate::method::{MethodCall, MethodResult};

/// Services inbound [`MethodCall`]s for one method channel.
#[async_trait]
pub trait MethodCallHandler: Send + Sync + 'static {
    /// Handle one call. Unknown method names answer
    /// [`MethodResult::NotImplemented`].
    async fn on_method_call(&self, call: MethodCall) -> MethodResult;
}
