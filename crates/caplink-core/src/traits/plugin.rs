// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by every capability plugin.

use async_trait::async_trait;

use crate::error::CaplinkError;

/// A named platform capability with an enable/disable lifecycle.
///
/// Both lifecycle operations are idempotent: calling them while already in
/// the target state is a no-op, not an error. Implementations own their
/// failures; the registry invoking these operations treats an `Err` as a
/// best-effort miss and never propagates it.
#[async_trait]
pub trait CapabilityPlugin: Send + Sync + 'static {
    /// Stable identifier this plugin is registered and addressed under.
    fn name(&self) -> &str;

    /// Start providing the capability (attach handlers, acquire resources,
    /// begin subscriptions).
    async fn enable(&self) -> Result<(), CaplinkError> {
        Ok(())
    }

    /// Stop providing the capability, releasing whatever `enable` acquired.
    async fn disable(&self) -> Result<(), CaplinkError> {
        Ok(())
    }
}
