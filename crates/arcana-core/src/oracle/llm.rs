//! `Oracle` implementation backed by a generative text provider.

use arcana_types::horoscope::{HoroscopeReading, Language};
use arcana_types::llm::{CompletionRequest, LlmError, Message};
use arcana_types::user::ReaderProfile;
use chrono::NaiveDate;
use tracing::warn;

use super::prompt;
use super::{Conversation, Oracle, ReadingContext};
use crate::llm::box_provider::BoxLlmProvider;

/// Reply used when the interpretation call fails.
pub const INTERPRETATION_FALLBACK: &str = "Xin lỗi, em không thể xem bài Tarot lúc này.";

/// Reply used when the continuation call fails.
pub const CONTINUATION_FALLBACK: &str = "Xin lỗi, em không thể trả lời lúc này.";

/// Short classification replies never need many tokens.
const CLASSIFY_MAX_TOKENS: u32 = 16;

pub struct LlmOracle {
    provider: BoxLlmProvider,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl LlmOracle {
    pub fn new(
        provider: BoxLlmProvider,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn ask(
        &self,
        system: &str,
        prompt: String,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            system: Some(system.to_string()),
            max_tokens,
            temperature: self.temperature,
        };
        let response = self.provider.complete(&request).await?;
        Ok(response.content.trim().to_string())
    }
}

impl Oracle for LlmOracle {
    #[tracing::instrument(name = "assess_relevance", skip(self, question), fields(provider = %self.provider.name()))]
    async fn assess_relevance(&self, topic: &str, question: &str) -> bool {
        match self
            .ask(
                prompt::RELEVANCE_SYSTEM_PROMPT,
                prompt::relevance_prompt(topic, question),
                CLASSIFY_MAX_TOKENS,
            )
            .await
        {
            Ok(reply) => prompt::is_exact_affirmative(&reply),
            Err(e) => {
                warn!(error = %e, "relevance check failed, treating question as unrelated");
                false
            }
        }
    }

    #[tracing::instrument(name = "propose_follow_ups", skip_all, fields(topic = %topic))]
    async fn propose_follow_ups(
        &self,
        topic: &str,
        question: &str,
        profile: &ReaderProfile,
    ) -> Result<Vec<String>, LlmError> {
        let reply = self
            .ask(
                prompt::READER_SYSTEM_PROMPT,
                prompt::follow_ups_prompt(topic, question, profile),
                self.max_tokens,
            )
            .await?;
        Ok(prompt::split_lines(&reply))
    }

    #[tracing::instrument(name = "validate_answer", skip_all)]
    async fn validate_answer(
        &self,
        topic: &str,
        main_question: &str,
        follow_up_question: &str,
        answer: &str,
    ) -> bool {
        match self
            .ask(
                prompt::VALIDATION_SYSTEM_PROMPT,
                prompt::validation_prompt(topic, main_question, follow_up_question, answer),
                CLASSIFY_MAX_TOKENS,
            )
            .await
        {
            Ok(reply) => prompt::mentions_affirmative(&reply),
            Err(e) => {
                warn!(error = %e, "answer validation failed, rejecting answer");
                false
            }
        }
    }

    #[tracing::instrument(name = "interpret", skip_all, fields(cards = reading.cards.len()))]
    async fn interpret(&self, reading: ReadingContext<'_>) -> String {
        match self
            .ask(
                prompt::READER_SYSTEM_PROMPT,
                prompt::interpretation_prompt(&reading),
                self.max_tokens,
            )
            .await
        {
            Ok(reply) if !reply.is_empty() => reply,
            Ok(_) => {
                warn!("interpretation came back empty");
                INTERPRETATION_FALLBACK.to_string()
            }
            Err(e) => {
                warn!(error = %e, "interpretation failed");
                INTERPRETATION_FALLBACK.to_string()
            }
        }
    }

    #[tracing::instrument(name = "continue_conversation", skip_all, fields(history = conversation.history.len()))]
    async fn continue_conversation(&self, conversation: Conversation<'_>, new_message: &str) -> String {
        match self
            .ask(
                prompt::READER_SYSTEM_PROMPT,
                prompt::continuation_prompt(&conversation, new_message),
                self.max_tokens,
            )
            .await
        {
            Ok(reply) if !reply.is_empty() => reply,
            Ok(_) => CONTINUATION_FALLBACK.to_string(),
            Err(e) => {
                warn!(error = %e, "continuation failed");
                CONTINUATION_FALLBACK.to_string()
            }
        }
    }

    #[tracing::instrument(name = "generate_horoscope", skip(self, profile), fields(zodiac = %profile.zodiac))]
    async fn generate_horoscope(
        &self,
        profile: &ReaderProfile,
        date: NaiveDate,
    ) -> Result<HoroscopeReading, LlmError> {
        let reply = self
            .ask(
                prompt::ASTROLOGER_SYSTEM_PROMPT,
                prompt::horoscope_prompt(profile, date),
                self.max_tokens,
            )
            .await?;
        prompt::parse_reading(&reply)
    }

    #[tracing::instrument(name = "translate_reading", skip(self, reading))]
    async fn translate_reading(
        &self,
        reading: &HoroscopeReading,
        from: Language,
        to: Language,
    ) -> Result<HoroscopeReading, LlmError> {
        let json = serde_json::to_string(reading)
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        let reply = self
            .ask(
                prompt::TRANSLATOR_SYSTEM_PROMPT,
                prompt::translation_prompt(&json, from, to),
                self.max_tokens,
            )
            .await?;
        prompt::parse_reading(&reply)
    }
}
