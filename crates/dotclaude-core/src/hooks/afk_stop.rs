//! Stop hook: while AFK mode is on, keep the assistant from ending its turn
//! silently. It is told to speak a summary and listen for a spoken reply.

use std::path::Path;

use serde::Deserialize;

use super::HookOutput;
use crate::afk::AfkState;

#[derive(Debug, Default, Deserialize)]
struct StopEvent {
    #[serde(default)]
    stop_hook_active: bool,
}

/// `None` means print nothing and let the assistant stop.
pub fn evaluate(input: &str, afk: AfkState, flag_path: &Path) -> Option<HookOutput> {
    if !afk.is_on() {
        return None;
    }
    let event: StopEvent = serde_json::from_str(input).unwrap_or_default();
    // Already continuing because of this hook: allow the stop to avoid a loop.
    if event.stop_hook_active {
        return None;
    }
    Some(HookOutput::block(block_reason(flag_path)))
}

pub fn block_reason(flag_path: &Path) -> String {
    format!(
        "AFK mode is on: the user is away from the keyboard and will not read the terminal. \
Before stopping, use the speaking skill to speak a short summary of what you did and what you need, \
then run `listen` and wait for the spoken reply. Continue with whatever the user says. \
If the user asks to leave AFK mode, run `dotclaude afk off` (or delete {}).",
        flag_path.display()
    )
}
