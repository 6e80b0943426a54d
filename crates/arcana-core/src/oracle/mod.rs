//! The reader's voice: every piece of generated text the backend needs.
//!
//! `Oracle` is the port the chat state machine and the horoscope service
//! consume. `LlmOracle` implements it over a [`BoxLlmProvider`], building
//! prompts and applying static fallbacks when the provider fails.
//!
//! [`BoxLlmProvider`]: crate::llm::box_provider::BoxLlmProvider

pub mod llm;
pub mod prompt;

use std::future::Future;

use arcana_types::chat::Message;
use arcana_types::horoscope::{HoroscopeReading, Language};
use arcana_types::llm::LlmError;
use arcana_types::user::ReaderProfile;
use chrono::NaiveDate;

/// Everything the interpretation call needs to know about a reading.
#[derive(Debug, Clone, Copy)]
pub struct ReadingContext<'a> {
    pub topic: &'a str,
    pub question: &'a str,
    pub cards: &'a [String],
    pub questions: &'a [String],
    pub answers: &'a [String],
    pub profile: &'a ReaderProfile,
}

/// The conversation so far, oldest message first.
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a> {
    pub topic: &'a str,
    pub question: &'a str,
    pub history: &'a [Message],
}

/// Generative text operations.
///
/// Chat-facing calls are best-effort: failures resolve to a fallback value
/// instead of an error. The exception is `propose_follow_ups`, whose caller
/// owns the fallback question set. Horoscope calls surface their errors.
pub trait Oracle: Send + Sync {
    /// Whether `question` belongs to `topic`. `false` on any failure.
    fn assess_relevance(
        &self,
        topic: &str,
        question: &str,
    ) -> impl Future<Output = bool> + Send;

    /// Up to a handful of clarifying questions, one per returned string.
    fn propose_follow_ups(
        &self,
        topic: &str,
        question: &str,
        profile: &ReaderProfile,
    ) -> impl Future<Output = Result<Vec<String>, LlmError>> + Send;

    /// Lenient check that `answer` addresses `follow_up_question`.
    /// `false` on any failure.
    fn validate_answer(
        &self,
        topic: &str,
        main_question: &str,
        follow_up_question: &str,
        answer: &str,
    ) -> impl Future<Output = bool> + Send;

    /// The narrative reading.
    fn interpret(&self, reading: ReadingContext<'_>) -> impl Future<Output = String> + Send;

    /// Free-form reply once the reading has been given.
    fn continue_conversation(
        &self,
        conversation: Conversation<'_>,
        new_message: &str,
    ) -> impl Future<Output = String> + Send;

    /// A day's horoscope, in the canonical language.
    fn generate_horoscope(
        &self,
        profile: &ReaderProfile,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HoroscopeReading, LlmError>> + Send;

    fn translate_reading(
        &self,
        reading: &HoroscopeReading,
        from: Language,
        to: Language,
    ) -> impl Future<Output = Result<HoroscopeReading, LlmError>> + Send;
}
