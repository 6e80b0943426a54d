//! In-memory fakes for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arcana_types::card::Card;
use arcana_types::chat::{
    Chat, ChatFilter, ChatListItem, ChatSummary, Message, SenderType,
};
use arcana_types::error::RepositoryError;
use arcana_types::horoscope::{Horoscope, HoroscopeReading, Language, LuckyColor};
use arcana_types::llm::LlmError;
use arcana_types::post::{FeedPost, Post};
use arcana_types::topic::Topic;
use arcana_types::user::{AuthType, Gender, ReaderProfile, User, UserRole};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::card::repository::CardRepository;
use crate::chat::repository::ChatRepository;
use crate::horoscope::repository::HoroscopeRepository;
use crate::oracle::{Conversation, Oracle, ReadingContext};
use crate::post::repository::PostRepository;
use crate::topic::repository::TopicRepository;
use crate::transport::MessageSink;
use crate::user::credentials::Credentials;
use crate::user::repository::UserRepository;

// ---------------------------------------------------------------------------
// Chats and messages
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ChatState {
    chats: HashMap<Uuid, Chat>,
    /// Insertion order doubles as the tie-breaker on equal timestamps.
    messages: Vec<Message>,
    topics: HashMap<Uuid, Topic>,
    fail_writes: bool,
}

#[derive(Clone, Default)]
pub struct MockChatRepository {
    state: Arc<Mutex<ChatState>>,
}

impl MockChatRepository {
    pub fn with_topic(self, topic: &Topic) -> Self {
        self.state.lock().unwrap().topics.insert(topic.id, topic.clone());
        self
    }

    pub fn insert_chat(&self, chat: Chat) {
        self.state.lock().unwrap().chats.insert(chat.id, chat);
    }

    pub fn chat(&self, id: Uuid) -> Option<Chat> {
        self.state.lock().unwrap().chats.get(&id).cloned()
    }

    pub fn messages(&self, chat_id: Uuid) -> Vec<Message> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }

    /// Make chat inserts and updates fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

impl ChatRepository for MockChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        if self.state.lock().unwrap().fail_writes {
            return Err(RepositoryError::Query("disk full".into()));
        }
        self.insert_chat(chat.clone());
        Ok(chat.clone())
    }

    async fn get_chat(&self, chat_id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chat(*chat_id))
    }

    async fn update_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(RepositoryError::Query("disk full".into()));
        }
        match state.chats.get_mut(&chat.id) {
            Some(stored) => {
                *stored = chat.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_chat(&self, chat_id: &Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.chats.remove(chat_id).ok_or(RepositoryError::NotFound)?;
        state.messages.retain(|m| m.chat_id != *chat_id);
        Ok(())
    }

    async fn get_summary(&self, chat_id: &Uuid) -> Result<Option<ChatSummary>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.chats.get(chat_id).map(|chat| {
            let topic = state.topics.get(&chat.topic_id);
            ChatSummary {
                id: chat.id,
                topic_id: chat.topic_id,
                topic_name: topic.map(|t| t.name.clone()).unwrap_or_default(),
                topic_image: topic.and_then(|t| t.image.clone()),
                question: chat.question.clone(),
                cards: chat.cards.clone(),
                status: chat.status,
                created_at: chat.created_at,
            }
        }))
    }

    async fn list_chats(
        &self,
        user_id: &Uuid,
        filter: &ChatFilter,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<ChatListItem>, u64), RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<(usize, ChatListItem)> = state
            .chats
            .values()
            .filter(|c| c.user_id == *user_id)
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| filter.topic_ids.is_empty() || filter.topic_ids.contains(&c.topic_id))
            .filter(|c| filter.from.is_none_or(|from| c.created_at >= from))
            .filter(|c| filter.to.is_none_or(|to| c.created_at <= to))
            .map(|c| {
                let latest = state
                    .messages
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.chat_id == c.id)
                    .last();
                let rank = latest.map(|(i, _)| i + 1).unwrap_or(0);
                let topic = state.topics.get(&c.topic_id);
                (
                    rank,
                    ChatListItem {
                        id: c.id,
                        topic_id: c.topic_id,
                        topic_name: topic.map(|t| t.name.clone()).unwrap_or_default(),
                        topic_image: topic.and_then(|t| t.image.clone()),
                        question: c.question.clone(),
                        status: c.status,
                        stage: c.stage,
                        created_at: c.created_at,
                        updated_at: c.updated_at,
                        latest_message: latest.map(|(_, m)| m.clone()),
                    },
                )
            })
            .collect();

        items.sort_by(|(ra, a), (rb, b)| {
            let ka = a.latest_message.as_ref().map(|m| m.created_at).unwrap_or(a.created_at);
            let kb = b.latest_message.as_ref().map(|m| m.created_at).unwrap_or(b.created_at);
            kb.cmp(&ka).then(rb.cmp(ra))
        });
        let total = items.len() as u64;
        let page = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(_, item)| item)
            .collect();
        Ok((page, total))
    }

    async fn close_chats_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let mut closed = 0;
        for chat in state.chats.values_mut() {
            if chat.status && chat.created_at < cutoff {
                chat.status = false;
                closed += 1;
            }
        }
        Ok(closed)
    }

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        self.state.lock().unwrap().messages.push(message.clone());
        Ok(())
    }

    async fn page_messages(
        &self,
        chat_id: &Uuid,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut messages = self.messages(*chat_id);
        messages.reverse();
        Ok(messages
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_messages(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        Ok(self.messages(*chat_id).len() as u64)
    }

    async fn history(&self, chat_id: &Uuid) -> Result<Vec<Message>, RepositoryError> {
        Ok(self.messages(*chat_id))
    }

    async fn mark_ai_messages_seen(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let mut flipped = 0;
        for message in state.messages.iter_mut() {
            if message.chat_id == *chat_id && message.sender_type == SenderType::Ai && !message.seen
            {
                message.seen = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockTopicRepository {
    topics: Arc<Mutex<Vec<Topic>>>,
}

impl MockTopicRepository {
    pub fn with(topics: &[Topic]) -> Self {
        Self {
            topics: Arc::new(Mutex::new(topics.to_vec())),
        }
    }
}

impl TopicRepository for MockTopicRepository {
    async fn create(&self, topic: &Topic) -> Result<Topic, RepositoryError> {
        let mut topics = self.topics.lock().unwrap();
        if topics.iter().any(|t| t.name.eq_ignore_ascii_case(&topic.name)) {
            return Err(RepositoryError::Conflict(topic.name.clone()));
        }
        topics.push(topic.clone());
        Ok(topic.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Topic>, RepositoryError> {
        Ok(self.topics.lock().unwrap().iter().find(|t| t.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Topic>, RepositoryError> {
        let mut topics = self.topics.lock().unwrap().clone();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(topics)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockCardRepository {
    cards: Arc<Mutex<Vec<Card>>>,
}

impl MockCardRepository {
    /// A deck holding the named cards.
    pub fn with_deck(names: &[&str]) -> Self {
        let cards = names
            .iter()
            .map(|name| Card::new(name, None).unwrap())
            .collect();
        Self {
            cards: Arc::new(Mutex::new(cards)),
        }
    }
}

impl CardRepository for MockCardRepository {
    async fn create(&self, card: &Card) -> Result<Card, RepositoryError> {
        let mut cards = self.cards.lock().unwrap();
        if cards.iter().any(|c| c.name.eq_ignore_ascii_case(&card.name)) {
            return Err(RepositoryError::Conflict(card.name.clone()));
        }
        cards.push(card.clone());
        Ok(card.clone())
    }

    async fn page(&self, limit: u32, offset: u64) -> Result<(Vec<Card>, u64), RepositoryError> {
        let mut cards = self.cards.lock().unwrap().clone();
        cards.sort_by(|a, b| a.name.cmp(&b.name));
        let total = cards.len() as u64;
        let page = cards
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn all(&self) -> Result<Vec<Card>, RepositoryError> {
        Ok(self.cards.lock().unwrap().clone())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Card>, RepositoryError> {
        Ok(self
            .cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| names.iter().any(|n| n.eq_ignore_ascii_case(&c.name)))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockPostRepository {
    posts: Arc<Mutex<Vec<Post>>>,
    authors: Arc<Mutex<HashMap<Uuid, String>>>,
}

impl MockPostRepository {
    pub fn with_author(self, admin: &User) -> Self {
        self.authors.lock().unwrap().insert(admin.id, admin.name.clone());
        self
    }
}

impl PostRepository for MockPostRepository {
    async fn create(&self, post: &Post) -> Result<Post, RepositoryError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Post>, RepositoryError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn update(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut posts = self.posts.lock().unwrap();
        let stored = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = post.clone();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != *id);
        if posts.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn feed(&self, limit: u32, offset: u64) -> Result<(Vec<FeedPost>, u64), RepositoryError> {
        let authors = self.authors.lock().unwrap();
        let mut posts: Vec<(usize, Post)> =
            self.posts.lock().unwrap().iter().cloned().enumerate().collect();
        posts.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        let total = posts.len() as u64;
        let page = posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(_, post)| FeedPost {
                admin_name: authors.get(&post.admin_id).cloned().unwrap_or_default(),
                post,
            })
            .collect();
        Ok((page, total))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    tokens: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl MockUserRepository {
    pub fn with(users: &[User]) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.users.lock().unwrap();
            for user in users {
                map.insert(user.id, user.clone());
            }
        }
        repo
    }

    pub fn points(&self, id: Uuid) -> Option<i64> {
        self.users.lock().unwrap().get(&id).and_then(User::points)
    }
}

impl UserRepository for MockUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.phone == user.phone) {
            return Err(RepositoryError::Conflict(user.phone.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn list_active_app_users(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.active && !u.is_admin())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn deduct_points(&self, id: &Uuid, amount: i64) -> Result<bool, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id).map(|u| &mut u.role) {
            Some(UserRole::App(profile)) if profile.points >= amount => {
                profile.points -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_points(&self, id: &Uuid, amount: i64) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id).map(|u| &mut u.role) {
            Some(UserRole::App(profile)) => {
                profile.points += amount;
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    async fn store_token(&self, user_id: &Uuid, token_hash: &str) -> Result<(), RepositoryError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), *user_id);
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let user_id = self.tokens.lock().unwrap().get(token_hash).copied();
        Ok(user_id.and_then(|id| self.users.lock().unwrap().get(&id).cloned()))
    }
}

/// Reversible "hashing" so tests can assert on stored values.
pub struct PlainCredentials;

impl Credentials for PlainCredentials {
    fn hash_password(&self, password: &str) -> Result<String, arcana_types::error::UserError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain${password}")
    }

    fn generate_token(&self) -> String {
        format!("tok_{}", Uuid::now_v7().simple())
    }

    fn hash_token(&self, token: &str) -> String {
        format!("h:{token}")
    }
}

// ---------------------------------------------------------------------------
// Horoscopes
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MockHoroscopeRepository {
    horoscopes: Arc<Mutex<Vec<Horoscope>>>,
    translations: Arc<Mutex<HashMap<(Uuid, Language), HoroscopeReading>>>,
}

impl MockHoroscopeRepository {
    pub fn count(&self) -> usize {
        self.horoscopes.lock().unwrap().len()
    }

    pub fn cached_translations(&self) -> usize {
        self.translations.lock().unwrap().len()
    }
}

impl HoroscopeRepository for MockHoroscopeRepository {
    async fn get(&self, user_id: &Uuid, date: NaiveDate) -> Result<Option<Horoscope>, RepositoryError> {
        Ok(self
            .horoscopes
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.user_id == *user_id && h.date == date)
            .cloned())
    }

    async fn insert(&self, horoscope: &Horoscope) -> Result<Horoscope, RepositoryError> {
        let mut horoscopes = self.horoscopes.lock().unwrap();
        if horoscopes
            .iter()
            .any(|h| h.user_id == horoscope.user_id && h.date == horoscope.date)
        {
            return Err(RepositoryError::Conflict("horoscope exists".into()));
        }
        horoscopes.push(horoscope.clone());
        Ok(horoscope.clone())
    }

    async fn get_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
    ) -> Result<Option<HoroscopeReading>, RepositoryError> {
        Ok(self
            .translations
            .lock()
            .unwrap()
            .get(&(*horoscope_id, language))
            .cloned())
    }

    async fn put_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
        reading: &HoroscopeReading,
    ) -> Result<(), RepositoryError> {
        self.translations
            .lock()
            .unwrap()
            .insert((*horoscope_id, language), reading.clone());
        Ok(())
    }

    async fn delete_through(&self, date: NaiveDate) -> Result<u64, RepositoryError> {
        let mut horoscopes = self.horoscopes.lock().unwrap();
        let before = horoscopes.len();
        horoscopes.retain(|h| h.date > date);
        let ids: Vec<Uuid> = horoscopes.iter().map(|h| h.id).collect();
        self.translations
            .lock()
            .unwrap()
            .retain(|(id, _), _| ids.contains(id));
        Ok((before - horoscopes.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Oracle whose answers are set up front by the test.
pub struct ScriptedOracle {
    pub relevant: bool,
    /// `None` makes `propose_follow_ups` fail.
    pub follow_ups: Option<Vec<String>>,
    /// Consumed front to back; accepts once exhausted.
    pub validations: Mutex<VecDeque<bool>>,
    pub interpretation: String,
    pub continuation: String,
    pub calls: Mutex<Vec<String>>,
    /// History bodies seen by the last continuation call.
    pub last_history: Mutex<Vec<String>>,
    pub horoscopes_generated: AtomicUsize,
    pub translations: AtomicUsize,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self {
            relevant: true,
            follow_ups: Some(vec![
                "Điều gì khiến chị quan tâm đến chuyện tình cảm lúc này?".into(),
                "Chị đang mong đợi điều gì ở một mối quan hệ?".into(),
                "Gần đây chị có gặp ai đặc biệt không?".into(),
            ]),
            validations: Mutex::new(VecDeque::new()),
            interpretation: "Ba lá bài cho thấy một khởi đầu mới.".into(),
            continuation: "Không có gì đâu chị, chị cứ hỏi thêm nhé.".into(),
            calls: Mutex::new(Vec::new()),
            last_history: Mutex::new(Vec::new()),
            horoscopes_generated: AtomicUsize::new(0),
            translations: AtomicUsize::new(0),
        }
    }
}

impl ScriptedOracle {
    pub fn rejecting_next(self, count: usize) -> Self {
        self.validations
            .lock()
            .unwrap()
            .extend(std::iter::repeat_n(false, count));
        self
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

pub fn sample_reading(summary: &str) -> HoroscopeReading {
    HoroscopeReading {
        zodiac: "Sư Tử".into(),
        icon: "zodiac-leo".into(),
        summary: summary.into(),
        love: "love".into(),
        career: "career".into(),
        finance: "finance".into(),
        health: "health".into(),
        lucky_number: 7,
        lucky_color: LuckyColor {
            name: "Vàng".into(),
            code: "#FFD700".into(),
        },
    }
}

impl Oracle for ScriptedOracle {
    async fn assess_relevance(&self, _topic: &str, _question: &str) -> bool {
        self.record("assess_relevance");
        self.relevant
    }

    async fn propose_follow_ups(
        &self,
        _topic: &str,
        _question: &str,
        _profile: &ReaderProfile,
    ) -> Result<Vec<String>, LlmError> {
        self.record("propose_follow_ups");
        self.follow_ups.clone().ok_or(LlmError::Provider {
            message: "service unavailable".into(),
        })
    }

    async fn validate_answer(
        &self,
        _topic: &str,
        _main_question: &str,
        _follow_up_question: &str,
        _answer: &str,
    ) -> bool {
        self.record("validate_answer");
        self.validations.lock().unwrap().pop_front().unwrap_or(true)
    }

    async fn interpret(&self, _reading: ReadingContext<'_>) -> String {
        self.record("interpret");
        self.interpretation.clone()
    }

    async fn continue_conversation(&self, conversation: Conversation<'_>, _new_message: &str) -> String {
        self.record("continue_conversation");
        *self.last_history.lock().unwrap() =
            conversation.history.iter().map(|m| m.body.clone()).collect();
        self.continuation.clone()
    }

    async fn generate_horoscope(
        &self,
        _profile: &ReaderProfile,
        date: NaiveDate,
    ) -> Result<HoroscopeReading, LlmError> {
        self.horoscopes_generated.fetch_add(1, Ordering::SeqCst);
        Ok(sample_reading(&format!("vi {date}")))
    }

    async fn translate_reading(
        &self,
        reading: &HoroscopeReading,
        _from: Language,
        to: Language,
    ) -> Result<HoroscopeReading, LlmError> {
        self.translations.fetch_add(1, Ordering::SeqCst);
        Ok(HoroscopeReading {
            summary: format!("{to}: {}", reading.summary),
            ..reading.clone()
        })
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<(Uuid, Uuid, Message)>>>,
}

impl RecordingSink {
    pub fn bodies(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, m)| m.body.clone())
            .collect()
    }

    pub fn recipients(&self) -> Vec<Uuid> {
        self.delivered.lock().unwrap().iter().map(|(u, _, _)| *u).collect()
    }
}

impl MessageSink for RecordingSink {
    fn deliver(&self, user_id: Uuid, chat_id: Uuid, message: &Message) {
        self.delivered
            .lock()
            .unwrap()
            .push((user_id, chat_id, message.clone()));
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn app_user(points: i64) -> User {
    let mut user = User::new_app(
        "Lan".into(),
        "+84901234567".into(),
        NaiveDate::from_ymd_opt(1995, 7, 30).unwrap(),
        Gender::Female,
        AuthType::Phone,
        None,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    )
    .unwrap();
    if let UserRole::App(profile) = &mut user.role {
        profile.points = points;
    }
    user
}

pub fn admin_user() -> User {
    User::new_admin(
        "Root".into(),
        "+84900000000".into(),
        "root@arcana.app".into(),
        "plain$password".into(),
    )
    .unwrap()
}

/// Names of the cards every chat test deck holds.
pub const TEST_DECK: [&str; 4] = ["The Fool", "The Lovers", "The Star", "The Tower"];

pub fn love_topic() -> Topic {
    Topic::new("Love", Some("love".into()), Some("love.png".into())).unwrap()
}
