//! Conversation normalization: converts the caller-supplied turn history
//! into a bounded, role-tagged message sequence for invocation.

use crate::interview::session::HistoryMessage;
use crate::llm_client::{ChatMessage, ChatRole};

/// Oldest-preserving truncation bound on history turns.
pub const MAX_HISTORY_TURNS: usize = 12;
/// Per-turn content bound.
pub const MAX_TURN_CHARS: usize = 2000;
/// Directive bound.
pub const MAX_DIRECTIVE_CHARS: usize = 800;

/// Sent when the caller supplied neither history nor directive; the
/// invocation layer must never see zero messages.
const OPENING_MESSAGE: &str = "Start the session.";

/// Trims, then truncates to `max_chars` with a literal `...` marker when and
/// only when truncation occurred.
pub fn clamp_text(text: &str, max_chars: usize) -> String {
    let value = text.trim();
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut clamped: String = value.chars().take(max_chars).collect();
    clamped.push_str("...");
    clamped
}

/// Builds the message sequence for one turn: the last `MAX_HISTORY_TURNS`
/// history entries (clamped, empty ones dropped, `assistant` mapped to the
/// model role), followed by the directive as a trailing user message. Never
/// returns an empty sequence.
pub fn normalize(history: &[HistoryMessage], directive: &str) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut messages: Vec<ChatMessage> = history[start..]
        .iter()
        .filter_map(|message| {
            let text = clamp_text(&message.content, MAX_TURN_CHARS);
            if text.is_empty() {
                return None;
            }
            let role = if message.role == "assistant" {
                ChatRole::Model
            } else {
                ChatRole::User
            };
            Some(ChatMessage { role, text })
        })
        .collect();

    let directive = clamp_text(directive, MAX_DIRECTIVE_CHARS);
    if !directive.is_empty() {
        messages.push(ChatMessage {
            role: ChatRole::User,
            text: directive,
        });
    }

    if messages.is_empty() {
        messages.push(ChatMessage {
            role: ChatRole::User,
            text: OPENING_MESSAGE.to_string(),
        });
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> HistoryMessage {
        HistoryMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_clamp_short_string_is_identity() {
        assert_eq!(clamp_text("hello", 10), "hello");
    }

    #[test]
    fn test_clamp_exact_length_is_untouched() {
        let input = "a".repeat(3000);
        assert_eq!(clamp_text(&input, 3000), input);
    }

    #[test]
    fn test_clamp_truncates_and_marks() {
        let clamped = clamp_text(&"a".repeat(3010), 3000);
        assert_eq!(clamped.chars().count(), 3003);
        assert!(clamped.ends_with("..."));
    }

    #[test]
    fn test_clamp_trims_before_measuring() {
        assert_eq!(clamp_text("  hello  ", 5), "hello");
        assert_eq!(clamp_text("   ", 10), "");
    }

    #[test]
    fn test_clamp_is_idempotent_on_clamped_output() {
        let once = clamp_text(&"a".repeat(50), 10);
        assert_eq!(clamp_text(&once, 13), once);
    }

    #[test]
    fn test_empty_history_and_directive_yields_opening_message() {
        let messages = normalize(&[], "");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].text, "Start the session.");
    }

    #[test]
    fn test_keeps_only_last_twelve_turns() {
        let history: Vec<HistoryMessage> =
            (0..20).map(|i| turn("user", &format!("turn {i}"))).collect();
        let messages = normalize(&history, "");
        assert_eq!(messages.len(), MAX_HISTORY_TURNS);
        assert_eq!(messages[0].text, "turn 8");
        assert_eq!(messages.last().unwrap().text, "turn 19");
    }

    #[test]
    fn test_assistant_maps_to_model_everything_else_to_user() {
        let history = vec![
            turn("assistant", "question"),
            turn("user", "answer"),
            turn("system", "noise"),
        ];
        let messages = normalize(&history, "");
        assert_eq!(messages[0].role, ChatRole::Model);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].role, ChatRole::User);
    }

    #[test]
    fn test_blank_turns_are_dropped() {
        let history = vec![turn("user", "   "), turn("assistant", "kept")];
        let messages = normalize(&history, "");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "kept");
    }

    #[test]
    fn test_turn_content_clamped_to_two_thousand() {
        let history = vec![turn("user", &"x".repeat(2500))];
        let messages = normalize(&history, "");
        assert_eq!(messages[0].text.chars().count(), 2003);
        assert!(messages[0].text.ends_with("..."));
    }

    #[test]
    fn test_directive_appended_as_trailing_user_message() {
        let history = vec![turn("assistant", "question")];
        let messages = normalize(&history, "Wrap up now.");
        assert_eq!(messages.len(), 2);
        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.text, "Wrap up now.");
    }

    #[test]
    fn test_directive_clamped_to_eight_hundred() {
        let messages = normalize(&[], &"d".repeat(900));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text.chars().count(), 803);
    }

    #[test]
    fn test_max_length_is_thirteen() {
        let history: Vec<HistoryMessage> =
            (0..30).map(|i| turn("user", &format!("turn {i}"))).collect();
        let messages = normalize(&history, "directive");
        assert_eq!(messages.len(), MAX_HISTORY_TURNS + 1);
    }
}
