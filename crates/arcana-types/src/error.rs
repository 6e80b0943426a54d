use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in arcana-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from chat operations and the chat state machine.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("chat is closed")]
    Closed,

    #[error("stage cannot move back from '{from}' to '{to}'")]
    StageRegression { from: String, to: String },

    #[error("a reading needs exactly 3 cards, got {0}")]
    InvalidCards(usize),

    #[error("cards are already assigned to this chat")]
    CardsAlreadyAssigned,

    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("question is not related to the chosen topic")]
    IrrelevantQuestion,

    #[error("topic not found")]
    TopicNotFound,

    #[error("card '{0}' is not in the deck")]
    UnknownCard(String),

    #[error("card '{0}' was drawn twice")]
    DuplicateCard(String),

    #[error("not enough points: need {required}, have {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("oracle error: {0}")]
    Oracle(#[from] LlmError),
}

/// Errors related to user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("invalid user: {0}")]
    Invalid(String),

    #[error("phone '{0}' is already registered")]
    PhoneConflict(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to topic operations.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("topic not found")]
    NotFound,

    #[error("invalid topic name: {0}")]
    InvalidName(String),

    #[error("topic '{0}' already exists")]
    NameConflict(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to the card deck.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid card name: {0}")]
    InvalidName(String),

    #[error("card '{0}' already exists")]
    NameConflict(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to feed posts.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,

    #[error("post content cannot be empty")]
    EmptyContent,

    #[error("only admins can publish posts")]
    Forbidden,

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to horoscope operations.
#[derive(Debug, Error)]
pub enum HoroscopeError {
    #[error("horoscopes are only available to app users")]
    NoProfile,

    #[error("date {0} is outside the available window")]
    DateOutOfRange(String),

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
