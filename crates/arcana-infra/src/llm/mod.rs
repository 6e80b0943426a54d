//! LLM provider implementations.
//!
//! The reader talks to any OpenAI-compatible endpoint (Gemini by default).
//! [`create_provider`] builds the provider from [`LlmConfig`], resolving the
//! API key from the environment variable the config names.

pub mod openai_compat;

use secrecy::SecretString;

use arcana_core::llm::box_provider::BoxLlmProvider;
use arcana_types::config::LlmConfig;
use arcana_types::llm::LlmError;

use self::openai_compat::config::OpenAiCompatConfig;
use self::openai_compat::OpenAiCompatibleProvider;

/// Read the API key named by `config.api_key_env`.
pub fn resolve_api_key(config: &LlmConfig) -> Result<SecretString, LlmError> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(SecretString::from(key)),
        _ => {
            tracing::warn!(env = %config.api_key_env, "LLM API key is not set");
            Err(LlmError::AuthenticationFailed)
        }
    }
}

/// Create a [`BoxLlmProvider`] from the `[llm]` config section and a key.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_llm_config(
        config, api_key,
    ));
    tracing::info!(
        provider = %config.provider,
        model = %config.model,
        base_url = %config.base_url,
        "LLM provider configured"
    );
    BoxLlmProvider::new(provider)
}

/// Provider keyed from the environment.
///
/// A missing key yields a provider whose calls all fail authentication, so
/// the oracle serves its fallbacks and commands that never generate text
/// keep working.
pub fn provider_from_env(config: &LlmConfig) -> BoxLlmProvider {
    let api_key = resolve_api_key(config).unwrap_or_else(|_| SecretString::from(String::new()));
    create_provider(config, api_key)
}
