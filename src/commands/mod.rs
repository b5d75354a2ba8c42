//! Slash command handling
//!
//! The command core: extracts the submitted text, applies the link
//! rewriter, and shapes the result into a chat response. All failures are
//! resolved by the HTTP handler before this module is reached; everything
//! here returns plain values.

use serde::{Deserialize, Serialize};

use crate::rewrite::RuleSet;

/// Ephemeral prompt shown when the command is invoked without text.
pub const EMPTY_TEXT_PROMPT: &str = "You need to supply some text";

/// Form fields submitted by the chat platform with a slash command.
///
/// The platform sends more fields (channel id, user name, trigger word);
/// only `text` matters here and unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashForm {
    pub text: Option<String>,
}

/// A slash command response.
///
/// `InChannel` is visible to all participants; `Ephemeral` only to the
/// requester (used for user-input prompts). Serializes to the wire shape
/// `{ "response_type": "...", "text": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "response_type", content = "text", rename_all = "snake_case")]
pub enum CommandResponse {
    InChannel(String),
    Ephemeral(String),
}

/// Run the link-rewrite command on submitted text.
///
/// Absent or whitespace-only text yields the ephemeral prompt; otherwise
/// the text is rewritten verbatim (untrimmed) and returned in-channel.
/// The rewritten text is embedded as-is; any markup or unfurl suppression
/// is the response consumer's concern.
pub fn run_rewrite_command(rules: &RuleSet, text: Option<&str>) -> CommandResponse {
    match text {
        Some(t) if !t.trim().is_empty() => CommandResponse::InChannel(rules.rewrite(t)),
        _ => CommandResponse::Ephemeral(EMPTY_TEXT_PROMPT.to_string()),
    }
}
