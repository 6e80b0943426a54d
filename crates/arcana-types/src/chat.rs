//! Chat, message, and message-log paging types for Arcana.
//!
//! A `Chat` is one tarot reading: the user's question on a topic, the drawn
//! cards, and the clarifying follow-up exchange that precedes the
//! interpretation. `Message` is one utterance in that reading's log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a chat.
///
/// Stages are ordered: `Initial < AwaitingAnswer < Interpreted`. A chat
/// only ever moves forward through them.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (stage IN ('initial', 'awaiting_answer', 'interpreted'))`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChatStage {
    #[default]
    Initial,
    AwaitingAnswer,
    Interpreted,
}

impl fmt::Display for ChatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatStage::Initial => write!(f, "initial"),
            ChatStage::AwaitingAnswer => write!(f, "awaiting_answer"),
            ChatStage::Interpreted => write!(f, "interpreted"),
        }
    }
}

impl FromStr for ChatStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initial" => Ok(ChatStage::Initial),
            "awaiting_answer" => Ok(ChatStage::AwaitingAnswer),
            "interpreted" => Ok(ChatStage::Interpreted),
            other => Err(format!("invalid chat stage: '{other}'")),
        }
    }
}

/// One tarot reading session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub question: String,
    /// Drawn card identifiers. Empty until assigned; never shrinks.
    pub cards: Vec<String>,
    /// `true` while the reading is open, `false` once closed.
    pub status: bool,
    pub follow_up_questions: Vec<String>,
    /// Parallel to `follow_up_questions`; grows as questions are answered.
    pub follow_up_answers: Vec<String>,
    /// Index of the next unanswered follow-up question.
    pub current_follow_up_index: u32,
    pub stage: ChatStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// A fresh chat in the `Initial` stage with no follow-up state.
    pub fn new(user_id: Uuid, topic_id: Uuid, question: String, cards: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            topic_id,
            question,
            cards,
            status: true,
            follow_up_questions: Vec::new(),
            follow_up_answers: Vec::new(),
            current_follow_up_index: 0,
            stage: ChatStage::Initial,
            created_at: now,
            updated_at: now,
        }
    }

    /// The follow-up question currently waiting for an answer, if any.
    pub fn pending_question(&self) -> Option<&str> {
        self.follow_up_questions
            .get(self.current_follow_up_index as usize)
            .map(String::as_str)
    }

    /// Whether the follow-up bookkeeping is internally consistent.
    pub fn follow_ups_consistent(&self) -> bool {
        let index = self.current_follow_up_index as usize;
        index <= self.follow_up_questions.len() && self.follow_up_answers.len() == index
    }
}

/// Request to open a new reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChat {
    pub topic_id: Uuid,
    pub question: String,
    #[serde(default)]
    pub cards: Vec<String>,
}

/// Filters for the user's chat list. Empty filters match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatFilter {
    pub status: Option<bool>,
    #[serde(default)]
    pub topic_ids: Vec<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    User,
    Ai,
}

impl SenderType {
    /// Seen flag a freshly appended message of this kind starts with.
    ///
    /// The user has obviously seen what they typed; AI output starts unseen
    /// until the client acknowledges it.
    pub fn default_seen(self) -> bool {
        matches!(self, SenderType::User)
    }
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderType::User => write!(f, "user"),
            SenderType::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for SenderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(SenderType::User),
            "ai" => Ok(SenderType::Ai),
            other => Err(format!("invalid sender type: '{other}'")),
        }
    }
}

/// One utterance in a chat's message log.
///
/// Messages are immutable once written; only `seen` is ever flipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    /// Authoring user. `None` for AI-authored messages.
    pub sender_id: Option<Uuid>,
    pub sender_type: SenderType,
    pub body: String,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        chat_id: Uuid,
        sender_id: Option<Uuid>,
        sender_type: SenderType,
        body: String,
        seen: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id,
            sender_id,
            sender_type,
            body,
            seen,
            created_at: Utc::now(),
        }
    }
}

/// Parent-chat fields joined into a message page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub topic_name: String,
    pub topic_image: Option<String>,
    pub question: String,
    pub cards: Vec<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Paging {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Number of rows to skip to reach this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of a chat's message log, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePage {
    pub chat: ChatSummary,
    pub messages: Vec<Message>,
    pub paging: Paging,
}

/// A chat row in the user's chat list, carrying its latest message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListItem {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub topic_name: String,
    pub topic_image: Option<String>,
    pub question: String,
    pub status: bool,
    pub stage: ChatStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub latest_message: Option<Message>,
}

/// A page of the user's chat list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListPage {
    pub chats: Vec<ChatListItem>,
    pub paging: Paging,
}
