use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::conversation::{Conversation, Message, Sender};

/// Per-match message threads, most recent first.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// New conversations go to the front of the list.
    pub fn prepend(&mut self, conversation: Conversation) {
        self.conversations.insert(0, conversation);
    }

    /// Opens a thread with a live-chat match, seeded with their opener.
    pub fn open_live(
        &mut self,
        id: String,
        name: &str,
        opener: &str,
        theme: &str,
        now: DateTime<Utc>,
    ) -> &Conversation {
        let conversation = Conversation {
            id,
            name: name.to_string(),
            avatar_char: name.chars().next().unwrap_or('?'),
            last_message: opener.to_string(),
            unread_count: 1,
            messages: vec![Message {
                id: "first-msg".to_string(),
                sender: Sender::Them,
                text: opener.to_string(),
                timestamp: now,
            }],
            is_live: true,
            theme_context: Some(theme.to_string()),
        };
        self.prepend(conversation);
        &self.conversations[0]
    }

    /// Appends a message from the user.
    ///
    /// Returns `None` and leaves every conversation untouched when the text is
    /// blank or no conversation has this id.
    pub fn send_message(
        &mut self,
        conversation_id: &str,
        message_id: String,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<&Conversation> {
        if text.trim().is_empty() {
            return None;
        }
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)?;

        conversation.messages.push(Message {
            id: message_id,
            sender: Sender::Me,
            text: text.to_string(),
            timestamp: now,
        });
        conversation.last_message = text.to_string();
        conversation.unread_count = 0;
        debug!(
            "message sent to conversation {} ({} total)",
            conversation.id,
            conversation.messages.len()
        );
        Some(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swipe::reducer::MATCH_GREETING;

    fn conversation(id: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: "Maya".to_string(),
            avatar_char: 'M',
            last_message: MATCH_GREETING.to_string(),
            unread_count: 1,
            messages: vec![],
            is_live: false,
            theme_context: None,
        }
    }

    #[test]
    fn test_prepend_keeps_most_recent_first() {
        let mut store = ConversationStore::new();
        store.prepend(conversation("a"));
        store.prepend(conversation("b"));
        let ids: Vec<&str> = store.list().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_send_message_updates_thread() {
        let mut store = ConversationStore::new();
        store.prepend(conversation("a"));
        let now = Utc::now();
        let conv = store
            .send_message("a", "m1".to_string(), "hey there", now)
            .expect("known conversation");
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].sender, Sender::Me);
        assert_eq!(conv.messages[0].text, "hey there");
        assert_eq!(conv.last_message, "hey there");
        assert_eq!(conv.unread_count, 0);
    }

    #[test]
    fn test_send_blank_message_is_noop() {
        let mut store = ConversationStore::new();
        store.prepend(conversation("a"));
        let before = store.clone();
        assert!(store
            .send_message("a", "m1".to_string(), "   \n", Utc::now())
            .is_none());
        assert_eq!(store.list(), before.list());
    }

    #[test]
    fn test_send_to_unknown_conversation_is_noop() {
        let mut store = ConversationStore::new();
        store.prepend(conversation("a"));
        let before = store.clone();
        assert!(store
            .send_message("missing", "m1".to_string(), "hello", Utc::now())
            .is_none());
        assert_eq!(store.list(), before.list());
    }

    #[test]
    fn test_open_live_seeds_opener() {
        let mut store = ConversationStore::new();
        store.prepend(conversation("a"));
        let conv = store.open_live(
            "live-1".to_string(),
            "synthwave_sam",
            "Anyone else rewatching Blade Runner tonight?",
            "Cinema",
            Utc::now(),
        );
        assert!(conv.is_live);
        assert_eq!(conv.avatar_char, 's');
        assert_eq!(conv.unread_count, 1);
        assert_eq!(conv.messages[0].sender, Sender::Them);
        assert_eq!(conv.theme_context.as_deref(), Some("Cinema"));
        assert_eq!(store.list()[0].id, "live-1");
        assert_eq!(store.list().len(), 2);
    }
}
