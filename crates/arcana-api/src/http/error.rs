//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use arcana_types::error::{CardError, ChatError, HoroscopeError, PostError, TopicError, UserError};

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    User(UserError),
    Topic(TopicError),
    Card(CardError),
    Post(PostError),
    Horoscope(HoroscopeError),
    Unauthorized(String),
    Forbidden(String),
    Validation(String),
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

impl From<TopicError> for AppError {
    fn from(e: TopicError) -> Self {
        AppError::Topic(e)
    }
}

impl From<CardError> for AppError {
    fn from(e: CardError) -> Self {
        AppError::Card(e)
    }
}

impl From<PostError> for AppError {
    fn from(e: PostError) -> Self {
        AppError::Post(e)
    }
}

impl From<HoroscopeError> for AppError {
    fn from(e: HoroscopeError) -> Self {
        AppError::Horoscope(e)
    }
}

impl AppError {
    /// Status code, machine-readable code, and message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        let msg = |e: &dyn std::fmt::Display| e.to_string();
        match self {
            AppError::Chat(e) => match e {
                ChatError::NotFound => (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", msg(e)),
                ChatError::TopicNotFound => (StatusCode::NOT_FOUND, "TOPIC_NOT_FOUND", msg(e)),
                ChatError::Closed => (StatusCode::CONFLICT, "CHAT_CLOSED", msg(e)),
                ChatError::CardsAlreadyAssigned | ChatError::StageRegression { .. } => {
                    (StatusCode::CONFLICT, "CHAT_CONFLICT", msg(e))
                }
                ChatError::InvalidCards(_)
                | ChatError::UnknownCard(_)
                | ChatError::DuplicateCard(_)
                | ChatError::EmptyQuestion
                | ChatError::EmptyMessage => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg(e)),
                ChatError::IrrelevantQuestion => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "IRRELEVANT_QUESTION", msg(e))
                }
                ChatError::InsufficientPoints { .. } => {
                    (StatusCode::PAYMENT_REQUIRED, "INSUFFICIENT_POINTS", msg(e))
                }
                ChatError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg(e)),
                ChatError::Repository(_) | ChatError::Oracle(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_ERROR", msg(e))
                }
            },
            AppError::User(e) => match e {
                UserError::NotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", msg(e)),
                UserError::Invalid(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg(e)),
                UserError::PhoneConflict(_) => (StatusCode::CONFLICT, "PHONE_CONFLICT", msg(e)),
                UserError::Hashing(_) | UserError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "USER_ERROR", msg(e))
                }
            },
            AppError::Topic(e) => match e {
                TopicError::NotFound => (StatusCode::NOT_FOUND, "TOPIC_NOT_FOUND", msg(e)),
                TopicError::InvalidName(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg(e)),
                TopicError::NameConflict(_) => (StatusCode::CONFLICT, "TOPIC_CONFLICT", msg(e)),
                TopicError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "TOPIC_ERROR", msg(e))
                }
            },
            AppError::Card(e) => match e {
                CardError::InvalidName(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg(e)),
                CardError::NameConflict(_) => (StatusCode::CONFLICT, "CARD_CONFLICT", msg(e)),
                CardError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CARD_ERROR", msg(e)),
            },
            AppError::Post(e) => match e {
                PostError::NotFound => (StatusCode::NOT_FOUND, "POST_NOT_FOUND", msg(e)),
                PostError::EmptyContent => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg(e)),
                PostError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", msg(e)),
                PostError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "POST_ERROR", msg(e)),
            },
            AppError::Horoscope(e) => match e {
                HoroscopeError::NoProfile => (StatusCode::FORBIDDEN, "FORBIDDEN", msg(e)),
                HoroscopeError::DateOutOfRange(_) => {
                    (StatusCode::BAD_REQUEST, "DATE_OUT_OF_RANGE", msg(e))
                }
                HoroscopeError::Generation(_) => {
                    (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", msg(e))
                }
                HoroscopeError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "HOROSCOPE_ERROR", msg(e))
                }
            },
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", m.clone()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "FORBIDDEN", m.clone()),
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", m.clone()),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", m.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = serde_json::to_string(&ApiResponse::error(code, &message)).unwrap_or_else(|_| {
            r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#
                .to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_types::error::RepositoryError;

    #[test]
    fn chat_errors_map_to_statuses() {
        let cases = [
            (ChatError::NotFound, StatusCode::NOT_FOUND),
            (ChatError::Closed, StatusCode::CONFLICT),
            (ChatError::EmptyQuestion, StatusCode::BAD_REQUEST),
            (ChatError::UnknownCard("Ace of Cups".into()), StatusCode::BAD_REQUEST),
            (ChatError::IrrelevantQuestion, StatusCode::UNPROCESSABLE_ENTITY),
            (
                ChatError::InsufficientPoints {
                    required: 1,
                    available: 0,
                },
                StatusCode::PAYMENT_REQUIRED,
            ),
            (ChatError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                ChatError::Repository(RepositoryError::Connection),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn horoscope_window_is_a_bad_request() {
        let (status, code, _) =
            AppError::from(HoroscopeError::DateOutOfRange("2020-01-01".into())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "DATE_OUT_OF_RANGE");
    }

    #[test]
    fn conflicts_are_409() {
        assert_eq!(
            AppError::from(UserError::PhoneConflict("+84".into())).parts().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(TopicError::NameConflict("Love".into())).parts().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CardError::NameConflict("The Fool".into())).parts().0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn post_errors_map_to_statuses() {
        let (status, code, _) = AppError::from(PostError::NotFound).parts();
        assert_eq!((status, code), (StatusCode::NOT_FOUND, "POST_NOT_FOUND"));
        assert_eq!(AppError::from(PostError::Forbidden).parts().0, StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(PostError::EmptyContent).parts().0, StatusCode::BAD_REQUEST);
    }
}
