use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-5.1".to_string()
}

/// One entry of the token table: presenting `token` authenticates the
/// request as `user_id`.
#[derive(Clone, Debug, Serialize, Deserialize, TS)]
pub struct ApiToken {
    pub token: String,
    #[serde(alias = "userId")]
    pub user_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct AccessControlConfig {
    pub tokens: Vec<ApiToken>,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct AiConfig {
    #[serde(alias = "baseUrl")]
    pub base_url: String,
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: None,
            model: default_ai_model(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "configVersion")]
    pub config_version: String,
    #[serde(alias = "accessControl")]
    pub access_control: AccessControlConfig,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        self.access_control
            .tokens
            .retain(|t| !t.token.trim().is_empty() && !t.user_id.trim().is_empty());

        if matches!(
            self.ai.api_key.as_deref(),
            Some(key) if key.trim().is_empty()
        ) {
            self.ai.api_key = None;
        }
        if self.ai.base_url.trim().is_empty() {
            self.ai.base_url = default_ai_base_url();
        }
        if self.ai.model.trim().is_empty() {
            self.ai.model = default_ai_model();
        }

        self
    }

    /// Resolve a presented token to the user it belongs to.
    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.access_control
            .tokens
            .iter()
            .find(|t| t.token == token)
            .map(|t| t.user_id.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            access_control: AccessControlConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_empty_config() {
        let config = Config::from_raw("{}");

        assert_eq!(config.config_version, CURRENT_CONFIG_VERSION);
        assert!(config.access_control.tokens.is_empty());
        assert_eq!(config.ai.model, "gpt-5.1");
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn invalid_json_falls_back_to_default() {
        let config = Config::from_raw("{invalid json");

        assert_eq!(config.config_version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.ai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn aliases_and_normalization_are_applied() {
        let raw = r#"{
            "configVersion": "v0",
            "accessControl": {
                "tokens": [
                    { "token": "secret", "userId": "user-1" },
                    { "token": "  ", "userId": "user-2" }
                ]
            },
            "ai": { "apiKey": "", "model": "gpt-5.1-mini" }
        }"#;

        let config = Config::from_raw(raw);

        assert_eq!(config.config_version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.access_control.tokens.len(), 1);
        assert_eq!(config.user_for_token("secret"), Some("user-1"));
        assert_eq!(config.user_for_token("unknown"), None);
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.ai.model, "gpt-5.1-mini");
    }
}
