//! Notification hook: while AFK mode is on, announce that the assistant needs
//! the user, using a fixed phrase per notification type.

use serde::Deserialize;

use crate::afk::AfkState;
use crate::speech::Speaker;

pub const DEFAULT_TYPE: &str = "unknown";
pub const DEFAULT_MESSAGE: &str = "Claude needs your attention";

#[derive(Debug, Default, Deserialize)]
struct NotificationEvent {
    #[serde(default)]
    notification_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Permission,
    Question,
    Attention,
}

impl Category {
    pub fn from_type(notification_type: &str) -> Self {
        match notification_type {
            "permission_prompt" => Category::Permission,
            "elicitation_dialog" | "question" => Category::Question,
            _ => Category::Attention,
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Category::Permission => "Claude needs your permission to continue.",
            Category::Question => "Claude has a question for you.",
            Category::Attention => "Claude needs your attention.",
        }
    }
}

/// Speak the phrase for this notification if AFK mode is on.
///
/// Returns the phrase handed to `speaker`, or `None` when AFK is off. The
/// event's free-text `message` is logged but never spoken.
pub fn handle(input: &str, afk: AfkState, speaker: &dyn Speaker) -> Option<&'static str> {
    if !afk.is_on() {
        return None;
    }

    let event: NotificationEvent = serde_json::from_str(input).unwrap_or_else(|e| {
        tracing::debug!("afk-notify: unparsable input: {e}");
        NotificationEvent::default()
    });
    let notification_type = event.notification_type.as_deref().unwrap_or(DEFAULT_TYPE);
    let message = event.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
    tracing::debug!(notification_type, message, "afk notification");

    let phrase = Category::from_type(notification_type).phrase();
    if let Err(e) = speaker.speak(phrase) {
        tracing::warn!("speech failed: {e}");
    }
    Some(phrase)
}
