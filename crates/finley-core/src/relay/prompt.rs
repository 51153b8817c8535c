//! Conversation flattening.

use finley_types::chat::ConversationTurn;

/// Render history and the new message as a speaker-labelled transcript
/// ending in an open `Assistant:` turn.
///
/// ```text
/// User: hi
/// Assistant: hello
/// User: {message}
/// Assistant:
/// ```
pub fn flatten_prompt(history: &[ConversationTurn], message: &str) -> String {
    let mut lines: Vec<String> = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.speaker(), turn.content))
        .collect();
    lines.push(format!("User: {message}"));
    lines.push("Assistant:".to_string());
    lines.join("\n")
}

/// History followed by the new user turn, for message-array contracts.
pub fn chat_messages(history: &[ConversationTurn], message: &str) -> Vec<ConversationTurn> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.extend_from_slice(history);
    messages.push(ConversationTurn::user(message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_without_history() {
        assert_eq!(flatten_prompt(&[], "hi"), "User: hi\nAssistant:");
    }

    #[test]
    fn test_flatten_with_history() {
        let history = vec![
            ConversationTurn::user("How do I start saving?"),
            ConversationTurn::assistant("Try the 50/30/20 rule."),
        ];
        assert_eq!(
            flatten_prompt(&history, "What is that?"),
            "User: How do I start saving?\nAssistant: Try the 50/30/20 rule.\nUser: What is that?\nAssistant:"
        );
    }

    #[test]
    fn test_chat_messages_appends_user_turn() {
        let history = vec![ConversationTurn::assistant("Hi there")];
        let messages = chat_messages(&history, "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ConversationTurn::user("hello"));
    }
}
