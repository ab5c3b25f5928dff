// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named method-call model for the bridge.
//!
//! Inbound requests arrive as `{method, args}` pairs; the host side answers
//! with a [`MethodResult`]: success with a JSON value, a coded failure, or
//! not-implemented for methods the handler does not know.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code for caller usage errors rejected at the boundary, before the
/// registry or any store is consulted.
pub const INVALID_ARGUMENT_CODE: &str = "E000";

/// A named remote call with a free-form JSON argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name, e.g. `"enablePlugin"`.
    pub method: String,
    /// Argument payload; `null` when the method takes none.
    #[serde(default)]
    pub args: Value,
}

impl MethodCall {
    /// Create a call with the given method name and argument.
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// The argument as a string, if it is one.
    pub fn str_arg(&self) -> Option<&str> {
        self.args.as_str()
    }

    /// The argument as a list, if it is one.
    pub fn list_args(&self) -> Option<&Vec<Value>> {
        self.args.as_array()
    }

    /// The argument as a map, if it is one.
    pub fn map_args(&self) -> Option<&serde_json::Map<String, Value>> {
        self.args.as_object()
    }
}

/// A coded failure answered over a method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodError {
    /// Stable error code, e.g. [`INVALID_ARGUMENT_CODE`].
    pub code: String,
    /// Optional human-readable description.
    pub message: Option<String>,
    /// Optional structured detail payload.
    pub details: Option<Value>,
}

/// Outcome of dispatching a [`MethodCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
    /// The call succeeded with the given value (`null` for void methods).
    Success(Value),
    /// The call failed with a coded error.
    Failure(MethodError),
    /// No handler recognized the method name.
    NotImplemented,
}

impl MethodResult {
    /// Successful result carrying a value.
    pub fn success(value: Value) -> Self {
        MethodResult::Success(value)
    }

    /// Successful result for a void method.
    pub fn null() -> Self {
        MethodResult::Success(Value::Null)
    }

    /// Coded failure with an optional detail payload.
    pub fn failure(code: &str, message: impl Into<String>, details: Option<Value>) -> Self {
        MethodResult::Failure(MethodError {
            code: code.to_string(),
            message: Some(message.into()),
            details,
        })
    }

    /// Boundary rejection for malformed or missing arguments.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::failure(INVALID_ARGUMENT_CODE, message, None)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success(_))
    }

    /// The error code if this is a failure.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodResult::Failure(e) => Some(&e.code),
            _ => None,
        }
    }
}
