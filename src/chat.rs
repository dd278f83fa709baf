//! Direct messaging between doctors and their patients or colleagues.
//!
//! Pure helpers over `models::Conversation` / `models::Message`:
//! - sending (with blank-text rejection) and read-marking
//! - conversation list ordering and message search
//! - preview text for the conversation sidebar
//!
//! The chat-permission gate for patient conversations is applied by the
//! portal store, which knows the patient record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::enums::{MessageCategory, MessageStatus};
use crate::models::{Conversation, Message, Participant};

const PREVIEW_CHARS: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message text is empty")]
    EmptyMessage,
    #[error("Chat is disabled for patient {0}")]
    ChatDisabled(String),
    #[error("{0} is not a participant of conversation {1}")]
    NotParticipant(String, String),
}

/// Message as typed in the composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    pub content: String,
    pub category: Option<MessageCategory>,
}

// ═══════════════════════════════════════════
// Preview
// ═══════════════════════════════════════════

/// Sidebar preview of a message. Truncates at 50 characters with "..."
/// if longer, handling UTF-8 correctly.
pub fn message_preview(content: &str) -> String {
    let trimmed = content.trim();
    let mut chars = trimmed.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((boundary, _)) => format!("{}...", &trimmed[..boundary]),
        None => trimmed.to_string(),
    }
}

// ═══════════════════════════════════════════
// Sending and reading
// ═══════════════════════════════════════════

/// Appends a new `sent` message to the conversation.
pub fn send_message(
    conversation: &mut Conversation,
    sender: &Participant,
    draft: MessageDraft,
    now: DateTime<Utc>,
) -> Result<Message, ChatError> {
    if draft.content.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if !conversation.has_participant(&sender.id) {
        return Err(ChatError::NotParticipant(
            sender.id.clone(),
            conversation.id.clone(),
        ));
    }

    let message = Message {
        id: Uuid::new_v4().to_string(),
        conversation_id: conversation.id.clone(),
        sender: sender.clone(),
        content: draft.content,
        timestamp: now,
        status: MessageStatus::Sent,
        category: draft.category,
    };

    conversation.updated_at = now;
    conversation.last_message_preview = Some(message_preview(&message.content));
    conversation.unread_count += 1;

    tracing::debug!(conversation_id = %conversation.id, message_id = %message.id, "Message sent");

    Ok(message)
}

/// Clears the unread counter and marks everything `reader` did not send
/// as read. Returns the messages whose status changed.
pub fn mark_read(conversation: &mut Conversation, messages: &mut [Message], reader_id: &str) -> Vec<String> {
    conversation.unread_count = 0;

    messages
        .iter_mut()
        .filter(|m| m.conversation_id == conversation.id)
        .filter(|m| m.sender.id != reader_id && m.status != MessageStatus::Read)
        .map(|m| {
            m.status = MessageStatus::Read;
            m.id.clone()
        })
        .collect()
}

// ═══════════════════════════════════════════
// Listing and search
// ═══════════════════════════════════════════

/// Pinned first, then most recently updated. Archived conversations are
/// dropped unless asked for.
pub fn sort_conversations(mut conversations: Vec<Conversation>, include_archived: bool) -> Vec<Conversation> {
    conversations.retain(|c| include_archived || !c.archived);
    conversations.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    conversations
}

/// Case-insensitive substring search over message text, newest first.
pub fn search_messages<'a>(messages: &'a [Message], term: &str) -> Vec<&'a Message> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut found: Vec<&Message> = messages
        .iter()
        .filter(|m| m.content.to_lowercase().contains(&needle))
        .collect();
    found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    found
}

/// Thread of one conversation, oldest first.
pub fn conversation_thread(messages: Vec<Message>, conversation_id: &str) -> Vec<Message> {
    let mut thread: Vec<Message> = messages
        .into_iter()
        .filter(|m| m.conversation_id == conversation_id)
        .collect();
    thread.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    thread
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
