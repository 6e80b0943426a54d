//! Application state wiring all services together.
//!
//! Services are generic over repository/oracle/sink traits; AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use arcana_core::card::service::CardService;
use arcana_core::chat::service::ChatService;
use arcana_core::horoscope::service::HoroscopeService;
use arcana_core::oracle::llm::LlmOracle;
use arcana_core::post::service::PostService;
use arcana_core::topic::service::TopicService;
use arcana_core::user::service::UserService;
use arcana_infra::config::database_url;
use arcana_infra::crypto::credentials::Argon2Credentials;
use arcana_infra::llm::provider_from_env;
use arcana_infra::sqlite::card::SqliteCardRepository;
use arcana_infra::sqlite::chat::SqliteChatRepository;
use arcana_infra::sqlite::horoscope::SqliteHoroscopeRepository;
use arcana_infra::sqlite::pool::DatabasePool;
use arcana_infra::sqlite::post::SqlitePostRepository;
use arcana_infra::sqlite::topic::SqliteTopicRepository;
use arcana_infra::sqlite::user::SqliteUserRepository;
use arcana_types::config::{ArcanaConfig, LlmConfig};

use crate::transport::WsTransport;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<
    SqliteChatRepository,
    SqliteTopicRepository,
    SqliteUserRepository,
    SqliteCardRepository,
    LlmOracle,
    WsTransport,
>;

pub type ConcreteUserService = UserService<SqliteUserRepository, Argon2Credentials>;

pub type ConcreteTopicService = TopicService<SqliteTopicRepository>;

pub type ConcreteCardService = CardService<SqliteCardRepository>;

pub type ConcretePostService = PostService<SqlitePostRepository>;

pub type ConcreteHoroscopeService = HoroscopeService<SqliteHoroscopeRepository, LlmOracle>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub user_service: Arc<ConcreteUserService>,
    pub topic_service: Arc<ConcreteTopicService>,
    pub card_service: Arc<ConcreteCardService>,
    pub post_service: Arc<ConcretePostService>,
    pub horoscope_service: Arc<ConcreteHoroscopeService>,
    pub transport: WsTransport,
    pub config: Arc<ArcanaConfig>,
    pub data_dir: PathBuf,
    /// Cancelled on shutdown; long-lived socket tasks watch it.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Connect to the database and wire the services.
    pub async fn init(data_dir: PathBuf, config: ArcanaConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let transport = WsTransport::new();

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteTopicRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
            SqliteCardRepository::new(db_pool.clone()),
            build_oracle(&config.llm),
            transport.clone(),
            config.chat.reading_cost,
        );

        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2Credentials::new(),
        );

        let topic_service = TopicService::new(SqliteTopicRepository::new(db_pool.clone()));
        let card_service = CardService::new(SqliteCardRepository::new(db_pool.clone()));
        let post_service = PostService::new(SqlitePostRepository::new(db_pool.clone()));

        let horoscope_service = HoroscopeService::new(
            SqliteHoroscopeRepository::new(db_pool.clone()),
            build_oracle(&config.llm),
            config.horoscope.utc_offset_hours,
            config.horoscope.retention_days,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            user_service: Arc::new(user_service),
            topic_service: Arc::new(topic_service),
            card_service: Arc::new(card_service),
            post_service: Arc::new(post_service),
            horoscope_service: Arc::new(horoscope_service),
            transport,
            config: Arc::new(config),
            data_dir,
            shutdown: CancellationToken::new(),
        })
    }
}

fn build_oracle(config: &LlmConfig) -> LlmOracle {
    LlmOracle::new(
        provider_from_env(config),
        &config.model,
        config.max_tokens,
        config.temperature,
    )
}
