//! Handlers for the assistant's hook commands.
//!
//! Every handler takes the raw stdin text and returns what to print. None of
//! them can fail: malformed input degrades to the neutral response, because a
//! hook that errors would break the host's event pipeline.

pub mod advisory;
pub mod afk_notify;
pub mod afk_stop;
pub mod due_alerts;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub additional_context: Option<String>,
}

/// JSON envelope written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub decision: Option<Decision>,
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

impl HookOutput {
    /// All fields null: the host proceeds as if the hook were absent.
    pub fn noop() -> Self {
        Self {
            decision: None,
            reason: None,
            hook_specific_output: Some(HookSpecificOutput {
                additional_context: None,
            }),
        }
    }

    /// Non-blocking extra context for the assistant.
    pub fn context(text: impl Into<String>) -> Self {
        Self {
            decision: None,
            reason: None,
            hook_specific_output: Some(HookSpecificOutput {
                additional_context: Some(text.into()),
            }),
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Some(Decision::Block),
            reason: Some(reason.into()),
            hook_specific_output: None,
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings and nulls: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"decision":null,"reason":null,"hookSpecificOutput":{"additionalContext":null}}"#
                .to_string()
        })
    }
}
