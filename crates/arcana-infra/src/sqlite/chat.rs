//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `arcana-core` using sqlx with split
//! read/write pools. List-valued chat columns (cards, follow-up questions
//! and answers) are stored as JSON arrays. Message order ties are broken by
//! `rowid`, i.e. insertion order.

use arcana_core::chat::repository::ChatRepository;
use arcana_types::chat::{Chat, ChatFilter, ChatListItem, ChatStage, ChatSummary, Message, SenderType};
use arcana_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: String,
    user_id: String,
    topic_id: String,
    question: String,
    cards: String,
    status: bool,
    follow_up_questions: String,
    follow_up_answers: String,
    current_follow_up_index: i64,
    stage: String,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            topic_id: row.try_get("topic_id")?,
            question: row.try_get("question")?,
            cards: row.try_get("cards")?,
            status: row.try_get("status")?,
            follow_up_questions: row.try_get("follow_up_questions")?,
            follow_up_answers: row.try_get("follow_up_answers")?,
            current_follow_up_index: row.try_get("current_follow_up_index")?,
            stage: row.try_get("stage")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let stage: ChatStage = self.stage.parse().map_err(RepositoryError::Query)?;
        Ok(Chat {
            id: parse_uuid(&self.id, "chat id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            topic_id: parse_uuid(&self.topic_id, "topic_id")?,
            question: self.question,
            cards: parse_list(&self.cards)?,
            status: self.status,
            follow_up_questions: parse_list(&self.follow_up_questions)?,
            follow_up_answers: parse_list(&self.follow_up_answers)?,
            current_follow_up_index: self.current_follow_up_index as u32,
            stage,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    chat_id: String,
    sender_id: Option<String>,
    sender_type: String,
    body: String,
    seen: bool,
    created_at: String,
}

impl MessageRow {
    /// Columns are read as `{prefix}id`, `{prefix}body`, ... so the same
    /// mapping serves joined queries.
    fn from_row(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Self {
            id: row.try_get(col("id").as_str())?,
            chat_id: row.try_get(col("chat_id").as_str())?,
            sender_id: row.try_get(col("sender_id").as_str())?,
            sender_type: row.try_get(col("sender_type").as_str())?,
            body: row.try_get(col("body").as_str())?,
            seen: row.try_get(col("seen").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let sender_type: SenderType = self.sender_type.parse().map_err(RepositoryError::Query)?;
        Ok(Message {
            id: parse_uuid(&self.id, "message id")?,
            chat_id: parse_uuid(&self.chat_id, "chat_id")?,
            sender_id: self
                .sender_id
                .as_deref()
                .map(|s| parse_uuid(s, "sender_id"))
                .transpose()?,
            sender_type,
            body: self.body,
            seen: self.seen,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_list(json: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(json).map_err(|e| RepositoryError::Query(format!("invalid list column: {e}")))
}

fn encode_list(items: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(items).map_err(|e| RepositoryError::Query(e.to_string()))
}

fn rows_to_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Message>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let msg_row =
            MessageRow::from_row(row, "").map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(msg_row.into_message()?);
    }
    Ok(messages)
}

enum FilterValue {
    Text(String),
    Int(i64),
}

/// `WHERE` clause and bind values for a user's chat list.
fn list_filter(user_id: &Uuid, filter: &ChatFilter) -> (String, Vec<FilterValue>) {
    let mut clause = String::from("WHERE c.user_id = ?");
    let mut values = vec![FilterValue::Text(user_id.to_string())];

    if let Some(status) = filter.status {
        clause.push_str(" AND c.status = ?");
        values.push(FilterValue::Int(i64::from(status)));
    }
    if !filter.topic_ids.is_empty() {
        let placeholders = vec!["?"; filter.topic_ids.len()].join(", ");
        clause.push_str(&format!(" AND c.topic_id IN ({placeholders})"));
        values.extend(filter.topic_ids.iter().map(|id| FilterValue::Text(id.to_string())));
    }
    if let Some(from) = &filter.from {
        clause.push_str(" AND c.created_at >= ?");
        values.push(FilterValue::Text(format_datetime(from)));
    }
    if let Some(to) = &filter.to {
        clause.push_str(" AND c.created_at <= ?");
        values.push(FilterValue::Text(format_datetime(to)));
    }
    (clause, values)
}

fn bind_filter<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    values: &'q [FilterValue],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    for value in values {
        query = match value {
            FilterValue::Text(s) => query.bind(s.as_str()),
            FilterValue::Int(i) => query.bind(*i),
        };
    }
    query
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chats (id, user_id, topic_id, question, cards, status, follow_up_questions, follow_up_answers, current_follow_up_index, stage, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(chat.id.to_string())
        .bind(chat.user_id.to_string())
        .bind(chat.topic_id.to_string())
        .bind(&chat.question)
        .bind(encode_list(&chat.cards)?)
        .bind(chat.status)
        .bind(encode_list(&chat.follow_up_questions)?)
        .bind(encode_list(&chat.follow_up_answers)?)
        .bind(i64::from(chat.current_follow_up_index))
        .bind(chat.stage.to_string())
        .bind(format_datetime(&chat.created_at))
        .bind(format_datetime(&chat.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(chat.clone())
    }

    async fn get_chat(&self, chat_id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn update_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chats
               SET cards = ?, status = ?, follow_up_questions = ?, follow_up_answers = ?,
                   current_follow_up_index = ?, stage = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(encode_list(&chat.cards)?)
        .bind(chat.status)
        .bind(encode_list(&chat.follow_up_questions)?)
        .bind(encode_list(&chat.follow_up_answers)?)
        .bind(i64::from(chat.current_follow_up_index))
        .bind(chat.stage.to_string())
        .bind(format_datetime(&chat.updated_at))
        .bind(chat.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_chat(&self, chat_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn get_summary(&self, chat_id: &Uuid) -> Result<Option<ChatSummary>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT c.id, c.topic_id, c.question, c.cards, c.status, c.created_at,
                      t.name AS topic_name, t.image AS topic_image
               FROM chats c
               JOIN topics t ON t.id = c.topic_id
               WHERE c.id = ?"#,
        )
        .bind(chat_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let get = |e: sqlx::Error| RepositoryError::Query(e.to_string());

        let id: String = row.try_get("id").map_err(get)?;
        let topic_id: String = row.try_get("topic_id").map_err(get)?;
        let cards: String = row.try_get("cards").map_err(get)?;
        let created_at: String = row.try_get("created_at").map_err(get)?;

        Ok(Some(ChatSummary {
            id: parse_uuid(&id, "chat id")?,
            topic_id: parse_uuid(&topic_id, "topic_id")?,
            topic_name: row.try_get("topic_name").map_err(get)?,
            topic_image: row.try_get("topic_image").map_err(get)?,
            question: row.try_get("question").map_err(get)?,
            cards: parse_list(&cards)?,
            status: row.try_get("status").map_err(get)?,
            created_at: parse_datetime(&created_at)?,
        }))
    }

    async fn list_chats(
        &self,
        user_id: &Uuid,
        filter: &ChatFilter,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<ChatListItem>, u64), RepositoryError> {
        let (clause, values) = list_filter(user_id, filter);

        let count_sql = format!("SELECT COUNT(*) AS cnt FROM chats c {clause}");
        let count_row = bind_filter(sqlx::query(&count_sql), &values)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let total: i64 = count_row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let sql = format!(
            r#"SELECT c.*, t.name AS topic_name, t.image AS topic_image,
                      m.id AS m_id, m.chat_id AS m_chat_id, m.sender_id AS m_sender_id,
                      m.sender_type AS m_sender_type, m.body AS m_body, m.seen AS m_seen,
                      m.created_at AS m_created_at
               FROM chats c
               JOIN topics t ON t.id = c.topic_id
               LEFT JOIN messages m ON m.rowid = (
                   SELECT rowid FROM messages
                   WHERE chat_id = c.id
                   ORDER BY created_at DESC, rowid DESC
                   LIMIT 1
               )
               {clause}
               ORDER BY COALESCE(m.created_at, c.created_at) DESC, c.rowid DESC
               LIMIT {limit} OFFSET {offset}"#
        );
        let rows = bind_filter(sqlx::query(&sql), &values)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let get = |e: sqlx::Error| RepositoryError::Query(e.to_string());
            let chat = ChatRow::from_row(row).map_err(get)?.into_chat()?;
            let latest_id: Option<String> = row.try_get("m_id").map_err(get)?;
            let latest_message = match latest_id {
                Some(_) => Some(MessageRow::from_row(row, "m_").map_err(get)?.into_message()?),
                None => None,
            };
            items.push(ChatListItem {
                id: chat.id,
                topic_id: chat.topic_id,
                topic_name: row.try_get("topic_name").map_err(get)?,
                topic_image: row.try_get("topic_image").map_err(get)?,
                question: chat.question,
                status: chat.status,
                stage: chat.stage,
                created_at: chat.created_at,
                updated_at: chat.updated_at,
                latest_message,
            });
        }

        Ok((items, total as u64))
    }

    async fn close_chats_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE chats SET status = 0, updated_at = ? WHERE status = 1 AND created_at < ?",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(format_datetime(&cutoff))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages (id, chat_id, sender_id, sender_type, body, seen, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.to_string())
        .bind(message.sender_id.map(|id| id.to_string()))
        .bind(message.sender_type.to_string())
        .bind(&message.body)
        .bind(message.seen)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn page_messages(
        &self,
        chat_id: &Uuid,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM messages WHERE chat_id = ?
               ORDER BY created_at DESC, rowid DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(chat_id.to_string())
        .bind(i64::from(limit))
        .bind(offset as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_messages(&rows)
    }

    async fn count_messages(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM messages WHERE chat_id = ?")
            .bind(chat_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn history(&self, chat_id: &Uuid) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_messages(&rows)
    }

    async fn mark_ai_messages_seen(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET seen = 1 WHERE chat_id = ? AND sender_type = 'ai' AND seen = 0",
        )
        .bind(chat_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use crate::sqlite::topic::SqliteTopicRepository;
    use crate::sqlite::user::SqliteUserRepository;
    use arcana_core::topic::repository::TopicRepository;
    use arcana_core::user::repository::UserRepository;
    use arcana_types::topic::Topic;
    use arcana_types::user::{AuthType, Gender, User};
    use chrono::{Duration, NaiveDate};

    struct Fixture {
        repo: SqliteChatRepository,
        user: User,
        love: Topic,
        career: Topic,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let user = User::new_app(
            "Lan".into(),
            "+84901234567".into(),
            NaiveDate::from_ymd_opt(1995, 7, 30).unwrap(),
            Gender::Female,
            AuthType::Phone,
            None,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        SqliteUserRepository::new(pool.clone()).create(&user).await.unwrap();

        let topics = SqliteTopicRepository::new(pool.clone());
        let love = Topic::new("Love", None, Some("love.png".into())).unwrap();
        let career = Topic::new("Career", None, None).unwrap();
        topics.create(&love).await.unwrap();
        topics.create(&career).await.unwrap();

        Fixture {
            repo: SqliteChatRepository::new(pool),
            user,
            love,
            career,
        }
    }

    async fn new_chat(f: &Fixture, topic: &Topic) -> Chat {
        let chat = Chat::new(f.user.id, topic.id, "Will I find romance?".into(), vec![]);
        f.repo.create_chat(&chat).await.unwrap()
    }

    fn message(chat_id: Uuid, body: &str, at: DateTime<Utc>) -> Message {
        let mut message = Message::new(chat_id, None, SenderType::Ai, body.into(), false);
        message.created_at = at;
        message
    }

    #[tokio::test]
    async fn test_create_update_and_get_chat() {
        let f = fixture().await;
        let mut chat = new_chat(&f, &f.love).await;

        chat.cards = vec!["the-fool".into(), "the-sun".into(), "the-moon".into()];
        chat.follow_up_questions = vec!["Q1?".into(), "Q2?".into()];
        chat.follow_up_answers = vec!["a1".into()];
        chat.current_follow_up_index = 1;
        chat.stage = ChatStage::AwaitingAnswer;
        f.repo.update_chat(&chat).await.unwrap();

        let loaded = f.repo.get_chat(&chat.id).await.unwrap().unwrap();
        assert_eq!(loaded.cards, chat.cards);
        assert_eq!(loaded.follow_up_questions, chat.follow_up_questions);
        assert_eq!(loaded.follow_up_answers, vec!["a1"]);
        assert_eq!(loaded.current_follow_up_index, 1);
        assert_eq!(loaded.stage, ChatStage::AwaitingAnswer);
        assert!(loaded.status);
    }

    #[tokio::test]
    async fn test_update_missing_chat_is_not_found() {
        let f = fixture().await;
        let chat = Chat::new(f.user.id, f.love.id, "q".into(), vec![]);
        let err = f.repo.update_chat(&chat).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_messages() {
        let f = fixture().await;
        let chat = new_chat(&f, &f.love).await;
        f.repo
            .append_message(&message(chat.id, "hello", Utc::now()))
            .await
            .unwrap();

        f.repo.delete_chat(&chat.id).await.unwrap();
        assert!(f.repo.get_chat(&chat.id).await.unwrap().is_none());
        assert_eq!(f.repo.count_messages(&chat.id).await.unwrap(), 0);
        assert!(matches!(
            f.repo.delete_chat(&chat.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_message_order_and_ties() {
        let f = fixture().await;
        let chat = new_chat(&f, &f.love).await;
        let t0 = Utc::now();
        f.repo.append_message(&message(chat.id, "first", t0)).await.unwrap();
        f.repo.append_message(&message(chat.id, "second", t0)).await.unwrap();
        f.repo
            .append_message(&message(chat.id, "third", t0 + Duration::seconds(1)))
            .await
            .unwrap();

        let newest: Vec<_> = f
            .repo
            .page_messages(&chat.id, 10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(newest, vec!["third", "second", "first"]);

        let oldest: Vec<_> = f
            .repo
            .history(&chat.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(oldest, vec!["first", "second", "third"]);

        let second_page = f.repo.page_messages(&chat.id, 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].body, "first");
        assert_eq!(f.repo.count_messages(&chat.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_mark_ai_messages_seen() {
        let f = fixture().await;
        let chat = new_chat(&f, &f.love).await;
        f.repo.append_message(&message(chat.id, "ai", Utc::now())).await.unwrap();
        let user_msg = Message::new(chat.id, Some(f.user.id), SenderType::User, "me".into(), true);
        f.repo.append_message(&user_msg).await.unwrap();

        assert_eq!(f.repo.mark_ai_messages_seen(&chat.id).await.unwrap(), 1);
        assert_eq!(f.repo.mark_ai_messages_seen(&chat.id).await.unwrap(), 0);
        let history = f.repo.history(&chat.id).await.unwrap();
        assert!(history.iter().all(|m| m.seen));
        assert_eq!(history[1].sender_id, Some(f.user.id));
    }

    #[tokio::test]
    async fn test_summary_joins_topic() {
        let f = fixture().await;
        let chat = new_chat(&f, &f.love).await;
        let summary = f.repo.get_summary(&chat.id).await.unwrap().unwrap();
        assert_eq!(summary.topic_name, "Love");
        assert_eq!(summary.topic_image.as_deref(), Some("love.png"));
        assert_eq!(summary.question, "Will I find romance?");
        assert!(f.repo.get_summary(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_latest_message_and_filters() {
        let f = fixture().await;
        let older = new_chat(&f, &f.love).await;
        let newer = new_chat(&f, &f.career).await;
        // The older chat gets the most recent message, so it sorts first.
        f.repo
            .append_message(&message(older.id, "latest", Utc::now() + Duration::seconds(5)))
            .await
            .unwrap();

        let (items, total) = f
            .repo
            .list_chats(&f.user.id, &ChatFilter::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items[0].id, older.id);
        assert_eq!(items[0].latest_message.as_ref().unwrap().body, "latest");
        assert_eq!(items[1].id, newer.id);
        assert!(items[1].latest_message.is_none());

        let by_topic = ChatFilter {
            topic_ids: vec![f.career.id],
            ..ChatFilter::default()
        };
        let (items, total) = f.repo.list_chats(&f.user.id, &by_topic, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].topic_name, "Career");

        let closed = ChatFilter {
            status: Some(false),
            ..ChatFilter::default()
        };
        let (items, total) = f.repo.list_chats(&f.user.id, &closed, 10, 0).await.unwrap();
        assert_eq!(total, 0);
        assert!(items.is_empty());

        let (page, total) = f
            .repo
            .list_chats(&f.user.id, &ChatFilter::default(), 1, 1)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(page[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_close_chats_created_before() {
        let f = fixture().await;
        let mut old = Chat::new(f.user.id, f.love.id, "old".into(), vec![]);
        old.created_at = Utc::now() - Duration::days(4);
        f.repo.create_chat(&old).await.unwrap();
        let fresh = new_chat(&f, &f.love).await;

        let closed = f
            .repo
            .close_chats_created_before(Utc::now() - Duration::days(3))
            .await
            .unwrap();
        assert_eq!(closed, 1);
        assert!(!f.repo.get_chat(&old.id).await.unwrap().unwrap().status);
        assert!(f.repo.get_chat(&fresh.id).await.unwrap().unwrap().status);
    }
}
