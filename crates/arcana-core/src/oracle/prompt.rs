//! Prompt construction and reply parsing for the tarot reader.
//!
//! Everything here is pure so it can be tested without a provider. The
//! reader persona speaks Vietnamese, refers to itself as "em", and addresses
//! the user as "anh" or "chị" by gender.

use arcana_types::chat::SenderType;
use arcana_types::horoscope::{HoroscopeReading, Language};
use arcana_types::llm::LlmError;
use arcana_types::user::{Gender, ReaderProfile};
use chrono::NaiveDate;

use super::{Conversation, ReadingContext};

/// Persona shared by every chat-facing call.
pub const READER_SYSTEM_PROMPT: &str = r#"You are a warm, professional tarot reader chatting with a client in Vietnamese.
Refer to yourself as "em". Address the client as "anh" if they are male and "chị" if they are female.
Always reply in Vietnamese."#;

pub const RELEVANCE_SYSTEM_PROMPT: &str = r#"You classify whether a question fits a tarot reading topic.
A question fits when it is a real question with clear content and it concerns the topic.
Reply with exactly one word: "yes" if it fits, "no" if it does not."#;

pub const VALIDATION_SYSTEM_PROMPT: &str = r#"You check whether a client's answer addresses a clarifying question asked during a tarot reading.
Be lenient: if the answer is relevant, or the client is simply unsure, it counts as valid.
Reply with exactly one word: "yes" if valid, "no" if not."#;

pub const ASTROLOGER_SYSTEM_PROMPT: &str = r#"You are an astrologer writing short daily horoscopes in Vietnamese.
Reply with a single JSON object and nothing else."#;

pub const TRANSLATOR_SYSTEM_PROMPT: &str = r#"You translate JSON documents. Translate every string value, keep every key, number and hex color code unchanged.
Reply with the translated JSON object and nothing else."#;

/// How the reader addresses someone of the given gender.
pub fn honorific(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "anh",
        Gender::Female => "chị",
    }
}

fn profile_block(profile: &ReaderProfile) -> String {
    format!(
        "Client profile:\n- Name: {}\n- Gender: {}\n- Birth date: {}\n- Zodiac: {}",
        profile.name,
        profile.gender,
        profile.birth_date.format("%Y-%m-%d"),
        profile.zodiac
    )
}

pub fn relevance_prompt(topic: &str, question: &str) -> String {
    format!("Topic: {topic}\nQuestion: {question}")
}

pub fn follow_ups_prompt(topic: &str, question: &str, profile: &ReaderProfile) -> String {
    format!(
        "The client asked about the topic \"{topic}\": \"{question}\".\n\n\
         {}\n\n\
         Ask exactly 3 short clarifying questions that help you understand the client's \
         current situation or feelings before reading the cards.\n\
         - Put each question on its own line.\n\
         - No greeting, no numbering, no explanations.",
        profile_block(profile)
    )
}

pub fn validation_prompt(
    topic: &str,
    main_question: &str,
    follow_up_question: &str,
    answer: &str,
) -> String {
    format!(
        "Topic: {topic}\n\
         Main question: \"{main_question}\"\n\
         Clarifying question: \"{follow_up_question}\"\n\
         Client's answer: \"{answer}\"\n\n\
         Does the answer address the clarifying question?"
    )
}

pub fn interpretation_prompt(reading: &ReadingContext<'_>) -> String {
    let cards = if reading.cards.is_empty() {
        "(no cards drawn yet; read from the conversation alone)".to_string()
    } else {
        reading.cards.join("\n")
    };
    let exchange = reading
        .questions
        .iter()
        .zip(reading.answers.iter())
        .enumerate()
        .map(|(i, (q, a))| format!("Question {}: {q}\nAnswer {}: {a}", i + 1, i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\n\
         The client asked about the topic \"{}\": \"{}\".\n\n\
         They drew these cards:\n{cards}\n\n\
         You asked them to understand their situation better, and they answered:\n{exchange}\n\n\
         Give a detailed reading in the tone of a warm conversation, always addressing the \
         client as someone older than you. Explain each card and connect it to the client's \
         feelings and question. Finish with gentle, non-judgmental advice.",
        profile_block(reading.profile),
        reading.topic,
        reading.question,
    )
}

pub fn continuation_prompt(conversation: &Conversation<'_>, new_message: &str) -> String {
    let history = conversation
        .history
        .iter()
        .map(|m| {
            let speaker = match m.sender_type {
                SenderType::User => "Client",
                SenderType::Ai => "Reader",
            };
            format!("{speaker}: {}", m.body)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "A tarot conversation on the topic \"{}\" that started with the question: \"{}\".\n\n\
         Conversation so far:\n{history}\n\n\
         The client now says: \"{new_message}\"\n\n\
         - Only answer things related to the reading and the cards, as a tarot reader would. \
         Do not plan, explain unrelated subjects or give unrelated advice.\n\
         - If the message is unrelated, decline politely and briefly, saying you can only \
         help with the reading.\n\
         - If the client is just thanking you or saying hello, reply politely and invite \
         them to ask more if they need.",
        conversation.topic, conversation.question
    )
}

pub fn horoscope_prompt(profile: &ReaderProfile, date: NaiveDate) -> String {
    format!(
        "Write the daily horoscope for a {} born on {} (zodiac: {}) for {}.\n\
         Cover love, career & study, finance and health, pick a lucky number from 1 to 99 \
         and a lucky color.\n\n\
         Reply as JSON:\n\
         {{\n  \"zodiac\": \"<sign name in Vietnamese>\",\n  \"icon\": \"zodiac-{}\",\n  \
         \"summary\": \"...\",\n  \"love\": \"...\",\n  \"career\": \"...\",\n  \
         \"finance\": \"...\",\n  \"health\": \"...\",\n  \"luckyNumber\": 7,\n  \
         \"luckyColor\": {{ \"name\": \"...\", \"code\": \"#RRGGBB\" }}\n}}",
        match profile.gender {
            Gender::Male => "man",
            Gender::Female => "woman",
        },
        profile.birth_date.format("%Y-%m-%d"),
        profile.zodiac,
        date.format("%Y-%m-%d"),
        profile.zodiac,
    )
}

pub fn translation_prompt(json: &str, from: Language, to: Language) -> String {
    format!("Translate the following JSON from '{from}' to '{to}':\n\n{json}")
}

/// Relevance is affirmed only by an exact "yes" (case and trailing
/// punctuation aside).
pub fn is_exact_affirmative(reply: &str) -> bool {
    reply
        .trim()
        .trim_end_matches(['.', '!'])
        .eq_ignore_ascii_case("yes")
}

/// Validation accepts any reply that mentions "yes".
pub fn mentions_affirmative(reply: &str) -> bool {
    reply.to_lowercase().contains("yes")
}

/// Non-empty lines of a reply, with list markers removed.
pub fn split_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line);
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..]
            .strip_prefix(". ")
            .or_else(|| line[digits..].strip_prefix(") "))
        {
            return rest.trim();
        }
    }
    line.trim()
}

/// Remove Markdown code fences the model likes to wrap JSON in.
pub fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

pub fn parse_reading(reply: &str) -> Result<HoroscopeReading, LlmError> {
    serde_json::from_str(strip_code_fences(reply))
        .map_err(|e| LlmError::Deserialization(e.to_string()))
}
