//! Chat service driving a tarot reading from creation to conversation.
//!
//! A reading moves through three stages. The opening pass seeds the
//! clarifying questions and greets the reader, each accepted answer moves
//! the pending index forward, and the last one triggers the interpretation.
//! After that every inbound message gets a free-form reply grounded in the
//! full conversation.
//!
//! Every AI utterance is appended to the message log first, then handed to
//! the [`MessageSink`], then returned. All read-modify-write work on a chat
//! runs under that chat's lock.

use std::collections::HashSet;
use std::sync::Arc;

use arcana_types::chat::{
    Chat, ChatFilter, ChatListPage, ChatStage, Message, MessagePage, NewChat, Paging, SenderType,
};
use arcana_types::error::{ChatError, RepositoryError};
use arcana_types::user::{ReaderProfile, User};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::locks::ChatLocks;
use super::log::{MAX_PAGE_SIZE, MessageLog};
use super::machine::{self, AnswerOutcome};
use super::repository::ChatRepository;
use crate::card::repository::CardRepository;
use crate::oracle::{Conversation, Oracle, ReadingContext};
use crate::topic::repository::TopicRepository;
use crate::transport::MessageSink;
use crate::user::repository::UserRepository;

/// Number of cards a reading is drawn with.
pub const CARDS_PER_READING: usize = 3;

pub struct ChatService<C, T, U, K, O, S>
where
    C: ChatRepository,
    T: TopicRepository,
    U: UserRepository,
    K: CardRepository,
    O: Oracle,
    S: MessageSink,
{
    chat_repo: C,
    topic_repo: T,
    user_repo: U,
    card_repo: K,
    oracle: O,
    sink: S,
    locks: ChatLocks,
    reading_cost: i64,
}

impl<C, T, U, K, O, S> ChatService<C, T, U, K, O, S>
where
    C: ChatRepository,
    T: TopicRepository,
    U: UserRepository,
    K: CardRepository,
    O: Oracle,
    S: MessageSink,
{
    pub fn new(
        chat_repo: C,
        topic_repo: T,
        user_repo: U,
        card_repo: K,
        oracle: O,
        sink: S,
        reading_cost: i64,
    ) -> Self {
        Self {
            chat_repo,
            topic_repo,
            user_repo,
            card_repo,
            oracle,
            sink,
            locks: ChatLocks::new(),
            reading_cost,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn log(&self) -> MessageLog<'_, C> {
        MessageLog::new(&self.chat_repo)
    }

    // --- Creation ---

    /// Open a new reading for `user`.
    ///
    /// Checks the request and its cards against the deck, asks the oracle
    /// whether the question fits the topic, charges the reading cost, and persists the chat in the
    /// `Initial` stage. The points are refunded if the insert fails. The
    /// opening pass is not run here; see [`ChatService::spawn_opening`].
    pub async fn create_chat(&self, user: &User, request: NewChat) -> Result<Chat, ChatError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        if !request.cards.is_empty() && request.cards.len() != CARDS_PER_READING {
            return Err(ChatError::InvalidCards(request.cards.len()));
        }
        if user.is_admin() {
            return Err(ChatError::Forbidden("admins cannot open readings".to_string()));
        }

        let topic = self
            .topic_repo
            .get_by_id(&request.topic_id)
            .await?
            .ok_or(ChatError::TopicNotFound)?;
        self.check_cards(&request.cards).await?;

        if !self.oracle.assess_relevance(&topic.name, question).await {
            info!(user_id = %user.id, topic = %topic.name, "question rejected as off-topic");
            return Err(ChatError::IrrelevantQuestion);
        }

        self.charge(user.id).await?;

        let chat = Chat::new(user.id, topic.id, question.to_string(), request.cards);
        let chat = match self.chat_repo.create_chat(&chat).await {
            Ok(chat) => chat,
            Err(e) => {
                self.refund(user.id).await;
                return Err(e.into());
            }
        };

        info!(chat_id = %chat.id, user_id = %user.id, topic = %topic.name, "chat created");
        Ok(chat)
    }

    /// Drawn cards must be distinct cards of the deck. Names match ignoring
    /// ASCII case.
    async fn check_cards(&self, cards: &[String]) -> Result<(), ChatError> {
        if cards.is_empty() {
            return Ok(());
        }
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(repeat) = cards.iter().find(|c| !seen.insert(c.to_ascii_lowercase())) {
            return Err(ChatError::DuplicateCard(repeat.clone()));
        }
        let known = self.card_repo.find_by_names(cards).await?;
        match cards
            .iter()
            .find(|c| !known.iter().any(|k| k.name.eq_ignore_ascii_case(c)))
        {
            Some(unknown) => Err(ChatError::UnknownCard(unknown.clone())),
            None => Ok(()),
        }
    }

    async fn charge(&self, user_id: Uuid) -> Result<(), ChatError> {
        if self.reading_cost <= 0 {
            return Ok(());
        }
        if self.user_repo.deduct_points(&user_id, self.reading_cost).await? {
            return Ok(());
        }
        let available = self
            .user_repo
            .get_by_id(&user_id)
            .await?
            .and_then(|u| u.points())
            .unwrap_or(0);
        Err(ChatError::InsufficientPoints {
            required: self.reading_cost,
            available,
        })
    }

    async fn refund(&self, user_id: Uuid) {
        if self.reading_cost <= 0 {
            return;
        }
        if let Err(e) = self.user_repo.add_points(&user_id, self.reading_cost).await {
            warn!(user_id = %user_id, error = %e, "failed to refund reading cost");
        }
    }

    // --- State machine ---

    /// Run the opening pass if the chat is still `Initial`.
    ///
    /// Returns the first clarifying question, or `None` when the pass has
    /// already run.
    pub async fn open_reading(&self, chat_id: Uuid) -> Result<Option<Message>, ChatError> {
        let _guard = self.locks.acquire(chat_id).await;
        let mut chat = self.load(chat_id).await?;
        if chat.stage != ChatStage::Initial {
            debug!(chat_id = %chat_id, stage = %chat.stage, "opening pass already done");
            return Ok(None);
        }
        self.open_locked(&mut chat).await.map(Some)
    }

    /// Handle one message typed by the reader.
    ///
    /// Returns the AI reply, or `None` if the message could not be handled.
    /// Failures are logged, never propagated.
    pub async fn process_inbound_message(
        &self,
        chat_id: Uuid,
        sender: Uuid,
        text: &str,
    ) -> Option<Message> {
        match self.handle_inbound(chat_id, sender, text).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(chat_id = %chat_id, sender = %sender, error = %e, "inbound message not handled");
                None
            }
        }
    }

    /// Typed variant of [`ChatService::process_inbound_message`].
    pub async fn handle_inbound(
        &self,
        chat_id: Uuid,
        sender: Uuid,
        text: &str,
    ) -> Result<Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let _guard = self.locks.acquire(chat_id).await;
        let mut chat = self.load(chat_id).await?;
        if !chat.status {
            return Err(ChatError::Closed);
        }
        if chat.user_id != sender {
            return Err(ChatError::Forbidden("chat belongs to another user".to_string()));
        }

        let inbound = self
            .log()
            .append(chat_id, Some(sender), SenderType::User, text, Some(true))
            .await?;
        self.sink.deliver(chat.user_id, chat_id, &inbound);

        match chat.stage {
            ChatStage::Initial => self.open_locked(&mut chat).await,
            ChatStage::AwaitingAnswer => self.answer(&mut chat, text).await,
            ChatStage::Interpreted => self.converse(&chat, text, inbound.id).await,
        }
    }

    async fn open_locked(&self, chat: &mut Chat) -> Result<Message, ChatError> {
        let (topic, profile) = self.context(chat).await?;

        let proposed = self
            .oracle
            .propose_follow_ups(&topic, &chat.question, &profile)
            .await;
        let questions = machine::select_follow_ups(proposed);
        machine::begin_follow_ups(chat, questions)?;
        self.save(chat).await?;

        self.emit(chat, &machine::greeting(&profile)).await?;
        let first = chat.pending_question().unwrap_or_default().to_string();
        let message = self.emit(chat, &first).await?;
        info!(chat_id = %chat.id, "follow-up questions seeded");
        Ok(message)
    }

    async fn answer(&self, chat: &mut Chat, text: &str) -> Result<Message, ChatError> {
        let (topic, profile) = self.context(chat).await?;

        if let Some(pending) = chat.pending_question().map(str::to_owned) {
            let accepted = self
                .oracle
                .validate_answer(&topic, &chat.question, &pending, text)
                .await;
            if !accepted {
                debug!(chat_id = %chat.id, index = chat.current_follow_up_index, "answer rejected");
                return self.emit(chat, &machine::re_ask(&pending, &profile)).await;
            }
        }

        match machine::accept_answer(chat, text.to_string())? {
            AnswerOutcome::Next(question) => {
                self.save(chat).await?;
                self.emit(chat, &question).await
            }
            AnswerOutcome::Complete => {
                self.save(chat).await?;
                let reading = self
                    .oracle
                    .interpret(ReadingContext {
                        topic: &topic,
                        question: &chat.question,
                        cards: &chat.cards,
                        questions: &chat.follow_up_questions,
                        answers: &chat.follow_up_answers,
                        profile: &profile,
                    })
                    .await;
                info!(chat_id = %chat.id, "reading interpreted");
                self.emit(chat, &reading).await
            }
        }
    }

    async fn converse(&self, chat: &Chat, text: &str, inbound_id: Uuid) -> Result<Message, ChatError> {
        let (topic, _) = self.context(chat).await?;
        let mut history = self.log().history(chat.id).await?;
        history.retain(|m| m.id != inbound_id);

        let reply = self
            .oracle
            .continue_conversation(
                Conversation {
                    topic: &topic,
                    question: &chat.question,
                    history: &history,
                },
                text,
            )
            .await;
        self.emit(chat, &reply).await
    }

    /// Topic name and reader profile for the oracle.
    async fn context(&self, chat: &Chat) -> Result<(String, ReaderProfile), ChatError> {
        let topic = self
            .topic_repo
            .get_by_id(&chat.topic_id)
            .await?
            .ok_or(ChatError::TopicNotFound)?;
        let profile = self
            .user_repo
            .get_by_id(&chat.user_id)
            .await?
            .and_then(|u| u.reader_profile())
            .ok_or_else(|| ChatError::Forbidden("chat owner has no reader profile".to_string()))?;
        Ok((topic.name, profile))
    }

    async fn emit(&self, chat: &Chat, body: &str) -> Result<Message, ChatError> {
        let message = self
            .log()
            .append(chat.id, None, SenderType::Ai, body, None)
            .await?;
        self.sink.deliver(chat.user_id, chat.id, &message);
        Ok(message)
    }

    async fn load(&self, chat_id: Uuid) -> Result<Chat, ChatError> {
        self.chat_repo
            .get_chat(&chat_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    async fn save(&self, chat: &mut Chat) -> Result<(), ChatError> {
        chat.updated_at = Utc::now();
        self.chat_repo.update_chat(chat).await?;
        Ok(())
    }

    // --- Owner operations ---

    /// Load a chat, checking that `user_id` owns it.
    pub async fn owned_chat(&self, chat_id: Uuid, user_id: Uuid) -> Result<Chat, ChatError> {
        let chat = self.load(chat_id).await?;
        if chat.user_id != user_id {
            return Err(ChatError::Forbidden("chat belongs to another user".to_string()));
        }
        Ok(chat)
    }

    pub async fn page(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> Result<MessagePage, ChatError> {
        self.owned_chat(chat_id, user_id).await?;
        self.log().page(chat_id, page, page_size).await
    }

    /// The user's chats, most recently active first.
    pub async fn list_chats(
        &self,
        user_id: Uuid,
        filter: &ChatFilter,
        page: u32,
        page_size: u32,
    ) -> Result<ChatListPage, ChatError> {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(limit);
        let (chats, total) = self
            .chat_repo
            .list_chats(&user_id, filter, limit, offset)
            .await?;
        Ok(ChatListPage {
            chats,
            paging: Paging::new(page, limit, total),
        })
    }

    /// Hard-delete a chat and its messages.
    pub async fn delete_chat(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), ChatError> {
        let _guard = self.locks.acquire(chat_id).await;
        self.owned_chat(chat_id, user_id).await?;
        self.chat_repo.delete_chat(&chat_id).await.map_err(|e| match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => other.into(),
        })?;
        info!(chat_id = %chat_id, "chat deleted");
        Ok(())
    }

    /// Close a chat. Closing an already closed chat is a no-op.
    pub async fn close_chat(&self, chat_id: Uuid, user_id: Uuid) -> Result<Chat, ChatError> {
        let _guard = self.locks.acquire(chat_id).await;
        let mut chat = self.owned_chat(chat_id, user_id).await?;
        if chat.status {
            chat.status = false;
            self.save(&mut chat).await?;
            info!(chat_id = %chat_id, "chat closed");
        }
        Ok(chat)
    }

    /// Attach the drawn cards to a chat created without them.
    pub async fn assign_cards(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        cards: Vec<String>,
    ) -> Result<Chat, ChatError> {
        if cards.len() != CARDS_PER_READING {
            return Err(ChatError::InvalidCards(cards.len()));
        }
        self.check_cards(&cards).await?;
        let _guard = self.locks.acquire(chat_id).await;
        let mut chat = self.owned_chat(chat_id, user_id).await?;
        if !chat.status {
            return Err(ChatError::Closed);
        }
        if !chat.cards.is_empty() {
            return Err(ChatError::CardsAlreadyAssigned);
        }
        chat.cards = cards;
        self.save(&mut chat).await?;
        Ok(chat)
    }

    /// Acknowledge the chat's AI messages. Returns how many flipped.
    pub async fn mark_seen(&self, chat_id: Uuid, user_id: Uuid) -> Result<u64, ChatError> {
        self.owned_chat(chat_id, user_id).await?;
        Ok(self.log().mark_all_seen(chat_id).await?)
    }

    // --- Maintenance ---

    /// Close active chats created more than `retention_days` before `now`.
    pub async fn sweep_stale(&self, now: DateTime<Utc>, retention_days: u32) -> Result<u64, ChatError> {
        let cutoff = now - Duration::days(i64::from(retention_days));
        let closed = self.chat_repo.close_chats_created_before(cutoff).await?;
        let pruned = self.locks.prune();
        info!(closed, pruned_locks = pruned, %cutoff, "stale chat sweep finished");
        Ok(closed)
    }
}

impl<C, T, U, K, O, S> ChatService<C, T, U, K, O, S>
where
    C: ChatRepository + 'static,
    T: TopicRepository + 'static,
    U: UserRepository + 'static,
    K: CardRepository + 'static,
    O: Oracle + 'static,
    S: MessageSink + 'static,
{
    /// Run the opening pass in the background.
    pub fn spawn_opening(self: &Arc<Self>, chat_id: Uuid) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.open_reading(chat_id).await {
                warn!(chat_id = %chat_id, error = %e, "opening pass failed");
            }
        })
    }
}
