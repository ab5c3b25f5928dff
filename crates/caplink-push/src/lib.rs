// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push-notification capability plugin.
//!
//! The OS notification service is an injected [`NotificationGateway`];
//! the plugin services `requestPermission` and `getToken` on its channel.
//! Already-granted permission answers true without prompting again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use caplink_core::{
    CaplinkError, CapabilityPlugin, Messenger, MethodCall, MethodCallHandler, MethodError,
    MethodResult,
};

/// Channel and plugin name for the push capability.
pub const PUSH_CHANNEL: &str = "caplink.push";

/// Code for gateway failures reported over the channel.
pub const PUSH_ERROR_CODE: &str = "EPN000";

/// The platform notification service behind the plugin.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    /// Whether notification permission is already granted.
    async fn permission_granted(&self) -> Result<bool, CaplinkError>;

    /// Prompt the user; resolves once they answer.
    async fn request_permission(&self) -> Result<bool, CaplinkError>;

    /// The current device token, if one has been issued.
    async fn device_token(&self) -> Result<Option<String>, CaplinkError>;
}

fn gateway_failure(err: CaplinkError) -> MethodResult {
    MethodResult::Failure(MethodError {
        code: PUSH_ERROR_CODE.to_string(),
        message: None,
        details: Some(err.to_wire()),
    })
}

/// Push-notification capability plugin.
pub struct PushPlugin {
    messenger: Messenger,
    gateway: Arc<dyn NotificationGateway>,
}

impl PushPlugin {
    pub fn new(messenger: &Messenger, gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            messenger: messenger.clone(),
            gateway,
        }
    }
}

#[async_trait]
impl CapabilityPlugin for PushPlugin {
    fn name(&self) -> &str {
        PUSH_CHANNEL
    }

    async fn enable(&self) -> Result<(), CaplinkError> {
        self.messenger.set_handler(
            PUSH_CHANNEL,
            Arc::new(PushHandler {
                gateway: Arc::clone(&self.gateway),
            }),
        );
        Ok(())
    }

    async fn disable(&self) -> Result<(), CaplinkError> {
        self.messenger.clear_handler(PUSH_CHANNEL);
        Ok(())
    }
}

struct PushHandler {
    gateway: Arc<dyn NotificationGateway>,
}

#[async_trait]
impl MethodCallHandler for PushHandler {
    async fn on_method_call(&self, call: MethodCall) -> MethodResult {
        match call.method.as_str() {
            "requestPermission" => {
                // Skip the prompt when permission is already granted.
                match self.gateway.permission_granted().await {
                    Ok(true) => MethodResult::success(json!(true)),
                    Ok(false) => match self.gateway.request_permission().await {
                        Ok(granted) => MethodResult::success(json!(granted)),
                        Err(err) => gateway_failure(err),
                    },
                    Err(err) => gateway_failure(err),
                }
            }
            "getToken" => match self.gateway.device_token().await {
                Ok(Some(token)) => MethodResult::success(json!(token)),
                Ok(None) => MethodResult::success(Value::Null),
                Err(err) => gateway_failure(err),
            },
            _ => MethodResult::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock gateway with scripted permission state and prompt counting.
    struct MockGateway {
        granted: AtomicBool,
        answer: bool,
        prompts: AtomicUsize,
        token: Option<String>,
    }

    impl MockGateway {
        fn new(granted: bool, answer: bool, token: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                granted: AtomicBool::new(granted),
                answer,
                prompts: AtomicUsize::new(0),
                token: token.map(str::to_string),
            })
        }

        fn prompt_count(&self) -> usize {
            self.prompts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationGateway for MockGateway {
        async fn permission_granted(&self) -> Result<bool, CaplinkError> {
            Ok(self.granted.load(Ordering::SeqCst))
        }

        async fn request_permission(&self) -> Result<bool, CaplinkError> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.granted.store(self.answer, Ordering::SeqCst);
            Ok(self.answer)
        }

        async fn device_token(&self) -> Result<Option<String>, CaplinkError> {
            Ok(self.token.clone())
        }
    }

    async fn enabled_plugin(
        gateway: Arc<MockGateway>,
    ) -> (Messenger, Arc<PushPlugin>) {
        let (messenger, _rx) = Messenger::new();
        let plugin = Arc::new(PushPlugin::new(&messenger, gateway));
        plugin.enable().await.unwrap();
        (messenger, plugin)
    }

    #[tokio::test]
    async fn already_granted_permission_skips_the_prompt() {
        let gateway = MockGateway::new(true, false, None);
        let (messenger, _plugin) = enabled_plugin(gateway.clone()).await;

        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("requestPermission", Value::Null))
            .await;

        assert_eq!(result, MethodResult::Success(json!(true)));
        assert_eq!(gateway.prompt_count(), 0);
    }

    #[tokio::test]
    async fn prompt_answer_is_returned_to_the_caller() {
        let gateway = MockGateway::new(false, true, None);
        let (messenger, _plugin) = enabled_plugin(gateway.clone()).await;

        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("requestPermission", Value::Null))
            .await;

        assert_eq!(result, MethodResult::Success(json!(true)));
        assert_eq!(gateway.prompt_count(), 1);
    }

    #[tokio::test]
    async fn denied_prompt_returns_false() {
        let gateway = MockGateway::new(false, false, None);
        let (messenger, _plugin) = enabled_plugin(gateway.clone()).await;

        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("requestPermission", Value::Null))
            .await;

        assert_eq!(result, MethodResult::Success(json!(false)));
    }

    #[tokio::test]
    async fn get_token_returns_token_or_null() {
        let gateway = MockGateway::new(true, true, Some("tok-123"));
        let (messenger, _plugin) = enabled_plugin(gateway).await;
        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("getToken", Value::Null))
            .await;
        assert_eq!(result, MethodResult::Success(json!("tok-123")));

        let gateway = MockGateway::new(true, true, None);
        let (messenger, _plugin) = enabled_plugin(gateway).await;
        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("getToken", Value::Null))
            .await;
        assert_eq!(result, MethodResult::Success(Value::Null));
    }

    #[tokio::test]
    async fn disable_detaches_the_handler() {
        let gateway = MockGateway::new(true, true, None);
        let (messenger, plugin) = enabled_plugin(gateway).await;
        plugin.disable().await.unwrap();

        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("getToken", Value::Null))
            .await;
        assert_eq!(result, MethodResult::NotImplemented);
    }

    #[tokio::test]
    async fn unknown_method_is_not_implemented() {
        let gateway = MockGateway::new(true, true, None);
        let (messenger, _plugin) = enabled_plugin(gateway).await;
        let result = messenger
            .dispatch(PUSH_CHANNEL, MethodCall::new("subscribeTopic", Value::Null))
            .await;
        assert_eq!(result, MethodResult::NotImplemented);
    }
}
