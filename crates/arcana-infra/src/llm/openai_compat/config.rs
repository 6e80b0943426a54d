//! Connection settings for an OpenAI-compatible provider.

use secrecy::SecretString;

use arcana_types::config::LlmConfig;
use arcana_types::llm::ProviderCapabilities;

/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "gemini").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

impl OpenAiCompatConfig {
    pub fn from_llm_config(config: &LlmConfig, api_key: SecretString) -> Self {
        Self {
            provider_name: config.provider.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            capabilities: capabilities_for(&config.provider, config.max_tokens),
        }
    }
}

/// Known context sizes per provider; output is capped by `max_tokens`.
fn capabilities_for(provider: &str, max_tokens: u32) -> ProviderCapabilities {
    let max_context_tokens = match provider {
        "gemini" => 1_000_000,
        "openai" => 128_000,
        _ => 32_000,
    };
    ProviderCapabilities {
        max_context_tokens,
        max_output_tokens: max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let config = LlmConfig::default();
        let oai = OpenAiCompatConfig::from_llm_config(&config, SecretString::from("k"));
        assert_eq!(oai.provider_name, "gemini");
        assert_eq!(
            oai.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
        assert_eq!(oai.capabilities.max_context_tokens, 1_000_000);
        assert_eq!(oai.capabilities.max_output_tokens, config.max_tokens);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = LlmConfig {
            provider: "local".into(),
            base_url: "http://localhost:8080/v1/".into(),
            ..LlmConfig::default()
        };
        let oai = OpenAiCompatConfig::from_llm_config(&config, SecretString::from("k"));
        assert_eq!(oai.base_url, "http://localhost:8080/v1");
        assert_eq!(oai.capabilities.max_context_tokens, 32_000);
    }
}
