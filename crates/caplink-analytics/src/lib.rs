// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytics capability plugin.
//!
//! Wraps a vendor analytics SDK (injected as [`AnalyticsSdk`]) with a lazy
//! setup state machine: the SDK is set up at most once, on whichever comes
//! first of attach-while-enabled or the first enable. Disabling after setup
//! opts out rather than tearing the SDK down, and detaching always opts out.
//! SDK failures are logged and swallowed; the lifecycle itself never fails.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use caplink_core::{CaplinkError, CapabilityPlugin};

/// Plugin name for the analytics capability.
pub const ANALYTICS_PLUGIN_NAME: &str = "caplink.analytics";

/// The vendor analytics SDK behind the plugin.
pub trait AnalyticsSdk: Send + Sync + 'static {
    /// One-time SDK initialization with the configured app key.
    fn setup(&self, app_key: &str) -> Result<(), CaplinkError>;

    /// Resume event collection.
    fn opt_in(&self) -> Result<(), CaplinkError>;

    /// Suspend event collection.
    fn opt_out(&self) -> Result<(), CaplinkError>;
}

#[derive(Default)]
struct State {
    is_setup: bool,
    is_enabled: bool,
}

/// Analytics capability plugin.
pub struct AnalyticsPlugin {
    sdk: Arc<dyn AnalyticsSdk>,
    app_key: Option<String>,
    state: Mutex<State>,
}

impl AnalyticsPlugin {
    /// `app_key` of `None` means the host has no analytics configured;
    /// setup then records as done without touching the SDK.
    pub fn new(sdk: Arc<dyn AnalyticsSdk>, app_key: Option<String>) -> Self {
        Self {
            sdk,
            app_key,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Called when the plugin is registered against a channel. If a prior
    /// enable arrived before attach, setup runs now.
    pub fn attach(&self) {
        let mut state = self.state();
        if state.is_enabled && !state.is_setup {
            self.run_setup(&mut state);
        }
    }

    /// Called when the owning channel goes away. Collection stops.
    pub fn detach(&self) {
        if let Err(err) = self.sdk.opt_out() {
            warn!(error = %err, "analytics opt-out on detach failed");
        }
    }

    fn run_setup(&self, state: &mut State) {
        state.is_setup = true;
        let Some(app_key) = &self.app_key else {
            debug!("analytics setup skipped, no app key configured");
            return;
        };
        if let Err(err) = self.sdk.setup(app_key) {
            warn!(error = %err, "analytics sdk setup failed");
            return;
        }
        // Setup may run while disabled (attach after a stale enabled
        // state); keep collection off in that case.
        if !state.is_enabled {
            if let Err(err) = self.sdk.opt_out() {
                warn!(error = %err, "analytics opt-out after setup failed");
            }
        }
    }
}

#[async_trait]
impl CapabilityPlugin for AnalyticsPlugin {
    fn name(&self) -> &str {
        ANALYTICS_PLUGIN_NAME
    }

    async fn enable(&self) -> Result<(), CaplinkError> {
        let mut state = self.state();
        let was_enabled = state.is_enabled;
        state.is_enabled = true;
        if !state.is_setup {
            self.run_setup(&mut state);
        } else if !was_enabled {
            if let Err(err) = self.sdk.opt_in() {
                warn!(error = %err, "analytics opt-in failed");
            }
        }
        Ok(())
    }

    async fn disable(&self) -> Result<(), CaplinkError> {
        let mut state = self.state();
        state.is_enabled = false;
        if state.is_setup {
            if let Err(err) = self.sdk.opt_out() {
                warn!(error = %err, "analytics opt-out failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock SDK recording the call sequence.
    #[derive(Default)]
    struct MockSdk {
        calls: Mutex<Vec<String>>,
        fail_setup: bool,
    }

    impl MockSdk {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_setup: true,
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    impl AnalyticsSdk for MockSdk {
        fn setup(&self, app_key: &str) -> Result<(), CaplinkError> {
            self.record(&format!("setup:{app_key}"));
            if self.fail_setup {
                return Err(CaplinkError::Plugin {
                    message: "vendor refused".into(),
                    source: None,
                });
            }
            Ok(())
        }

        fn opt_in(&self) -> Result<(), CaplinkError> {
            self.record("opt_in");
            Ok(())
        }

        fn opt_out(&self) -> Result<(), CaplinkError> {
            self.record("opt_out");
            Ok(())
        }
    }

    #[tokio::test]
    async fn enable_then_attach_sets_up_exactly_once() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        plugin.enable().await.unwrap();
        plugin.attach();
        plugin.enable().await.unwrap();

        assert_eq!(sdk.calls(), vec!["setup:key-1"]);
    }

    #[tokio::test]
    async fn attach_then_enable_sets_up_on_enable() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        plugin.attach();
        assert!(sdk.calls().is_empty(), "attach alone must not set up");

        plugin.enable().await.unwrap();
        assert_eq!(sdk.calls(), vec!["setup:key-1"]);
    }

    #[tokio::test]
    async fn disable_after_setup_opts_out() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        plugin.enable().await.unwrap();
        plugin.disable().await.unwrap();

        assert_eq!(sdk.calls(), vec!["setup:key-1", "opt_out"]);
    }

    #[tokio::test]
    async fn disable_before_setup_does_not_touch_the_sdk() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        plugin.disable().await.unwrap();
        assert!(sdk.calls().is_empty());
    }

    #[tokio::test]
    async fn re_enable_after_disable_opts_back_in() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        plugin.enable().await.unwrap();
        plugin.disable().await.unwrap();
        plugin.enable().await.unwrap();

        assert_eq!(sdk.calls(), vec!["setup:key-1", "opt_out", "opt_in"]);
    }

    #[tokio::test]
    async fn missing_app_key_records_setup_without_sdk_calls() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), None);

        plugin.enable().await.unwrap();
        plugin.enable().await.unwrap();

        assert!(sdk.calls().is_empty());
        // Disable still believes setup happened; opt_out goes through.
        plugin.disable().await.unwrap();
        assert_eq!(sdk.calls(), vec!["opt_out"]);
    }

    #[tokio::test]
    async fn sdk_setup_failure_is_swallowed() {
        let sdk = MockSdk::failing();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));

        // Lifecycle must stay infallible toward the registry.
        plugin.enable().await.unwrap();
        assert_eq!(sdk.calls(), vec!["setup:key-1"]);
    }

    #[tokio::test]
    async fn detach_opts_out() {
        let sdk = MockSdk::new();
        let plugin = AnalyticsPlugin::new(sdk.clone(), Some("key-1".into()));
        plugin.enable().await.unwrap();
        plugin.detach();
        assert_eq!(sdk.calls(), vec!["setup:key-1", "opt_out"]);
    }
}
