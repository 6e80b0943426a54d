//! Pure stage transitions for a reading.
//!
//! These functions only mutate the in-memory `Chat`; persistence and
//! message emission are the service's job. Each transition checks the
//! stage it starts from, so a chat can never move backwards.

use arcana_types::chat::{Chat, ChatStage};
use arcana_types::error::ChatError;
use arcana_types::llm::LlmError;
use arcana_types::user::ReaderProfile;
use tracing::warn;

use crate::oracle::prompt::honorific;

/// Number of clarifying questions asked before the interpretation.
pub const FOLLOW_UP_COUNT: usize = 3;

/// Asked when the oracle cannot come up with its own questions.
pub const FALLBACK_FOLLOW_UPS: [&str; FOLLOW_UP_COUNT] = [
    "Bạn đang cảm thấy thế nào trong tình huống này?",
    "Bạn mong muốn điều gì sẽ thay đổi?",
    "Có điều gì khiến bạn đang lo lắng nhất không?",
];

/// What accepting an answer leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Another question is pending.
    Next(String),
    /// Every question is answered; the chat is now `Interpreted`.
    Complete,
}

/// Move `chat` to `to`, refusing to go backwards.
pub fn advance_stage(chat: &mut Chat, to: ChatStage) -> Result<(), ChatError> {
    if to < chat.stage {
        return Err(ChatError::StageRegression {
            from: chat.stage.to_string(),
            to: to.to_string(),
        });
    }
    chat.stage = to;
    Ok(())
}

/// Exactly [`FOLLOW_UP_COUNT`] questions from the oracle's proposal, or
/// the fallback set when the proposal failed or came up short.
pub fn select_follow_ups(proposed: Result<Vec<String>, LlmError>) -> Vec<String> {
    let fallback = || -> Vec<String> { FALLBACK_FOLLOW_UPS.iter().map(|q| q.to_string()).collect() };

    match proposed {
        Ok(mut questions) => {
            questions.retain(|q| !q.trim().is_empty());
            if questions.len() < FOLLOW_UP_COUNT {
                warn!(
                    proposed = questions.len(),
                    "too few follow-up questions proposed, using fallback set"
                );
                return fallback();
            }
            questions.truncate(FOLLOW_UP_COUNT);
            questions
        }
        Err(e) => {
            warn!(error = %e, "follow-up proposal failed, using fallback set");
            fallback()
        }
    }
}

/// Seed the follow-up exchange and enter `AwaitingAnswer`.
pub fn begin_follow_ups(chat: &mut Chat, questions: Vec<String>) -> Result<(), ChatError> {
    if chat.stage != ChatStage::Initial {
        return Err(ChatError::StageRegression {
            from: chat.stage.to_string(),
            to: ChatStage::Initial.to_string(),
        });
    }
    chat.follow_up_questions = questions;
    chat.follow_up_answers.clear();
    chat.current_follow_up_index = 0;
    advance_stage(chat, ChatStage::AwaitingAnswer)
}

/// Record an accepted answer to the pending question.
///
/// When it was the last one the chat moves to `Interpreted`.
pub fn accept_answer(chat: &mut Chat, answer: String) -> Result<AnswerOutcome, ChatError> {
    if chat.stage != ChatStage::AwaitingAnswer {
        return Err(ChatError::StageRegression {
            from: chat.stage.to_string(),
            to: ChatStage::AwaitingAnswer.to_string(),
        });
    }
    if chat.pending_question().is_some() {
        chat.follow_up_answers.push(answer);
        chat.current_follow_up_index += 1;
    }

    match chat.pending_question() {
        Some(next) => Ok(AnswerOutcome::Next(next.to_string())),
        None => {
            advance_stage(chat, ChatStage::Interpreted)?;
            Ok(AnswerOutcome::Complete)
        }
    }
}

/// Opening line sent before the first clarifying question.
pub fn greeting(profile: &ReaderProfile) -> String {
    let honorific = honorific(profile.gender);
    format!(
        "Em chào {honorific} {}! Trước khi xem bài, em xin phép hỏi {honorific} vài câu để hiểu rõ hơn về hoàn cảnh của {honorific} nhé.",
        profile.name
    )
}

/// Polite re-ask after an answer was judged off-topic.
pub fn re_ask(question: &str, profile: &ReaderProfile) -> String {
    let honorific = honorific(profile.gender);
    format!(
        "Em chưa hiểu rõ câu trả lời của {honorific}. {} có thể chia sẻ thêm được không ạ? {question}",
        capitalize(honorific)
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
