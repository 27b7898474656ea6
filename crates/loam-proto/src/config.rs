use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout; a timeout is reported like any fetch failure.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Settings for the Bedrock chat adapter. Named profiles override the
/// top-level values field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Environment variable holding the Bedrock API key.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Base URL override, e.g. a proxy. Defaults to the regional endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub profiles: BTreeMap<String, ChatProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChatProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Preloaded into the URL bar on start-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            model_id: default_model_id(),
            max_new_tokens: default_max_new_tokens(),
            token_env: default_token_env(),
            endpoint: None,
            timeout_secs: default_chat_timeout(),
            profiles: BTreeMap::new(),
        }
    }
}

impl ChatConfig {
    /// Flatten the named profile (if any) onto the defaults.
    ///
    /// An unknown profile name is an error rather than a silent fallback.
    pub fn resolve(&self, profile: Option<&str>) -> anyhow::Result<ChatConfig> {
        let mut resolved = self.clone();
        resolved.profiles.clear();

        let Some(name) = profile.filter(|p| !p.is_empty()) else {
            return Ok(resolved);
        };
        let p = self
            .profiles
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown chat profile {:?}", name))?;

        if let Some(region) = &p.region {
            resolved.region = region.clone();
        }
        if let Some(model_id) = &p.model_id {
            resolved.model_id = model_id.clone();
        }
        if let Some(token_env) = &p.token_env {
            resolved.token_env = token_env.clone();
        }
        if p.endpoint.is_some() {
            resolved.endpoint = p.endpoint.clone();
        }
        Ok(resolved)
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("loam/{}", env!("CARGO_PKG_VERSION"))
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "amazon.nova-lite-v1:0".to_string()
}

fn default_max_new_tokens() -> u32 {
    1000
}

fn default_token_env() -> String {
    "AWS_BEARER_TOKEN_BEDROCK".to_string()
}

fn default_chat_timeout() -> u64 {
    60
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.fetch.user_agent.starts_with("loam/"));
        assert_eq!(config.chat.region, "us-east-1");
        assert_eq!(config.chat.model_id, "amazon.nova-lite-v1:0");
        assert_eq!(config.chat.max_new_tokens, 1000);
        assert!(config.ui.start_url.is_none());
        assert!(Config::config_path().ends_with("loam/config.toml"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [chat]
            model_id = "amazon.nova-pro-v1:0"

            [ui]
            start_url = "https://iiif.io/api/cookbook/recipe/0032-collection/collection.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.chat.model_id, "amazon.nova-pro-v1:0");
        assert_eq!(config.chat.region, "us-east-1");
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.ui.start_url.is_some());
    }

    #[test]
    fn profile_overrides_fields() {
        let config = Config::from_toml_str(
            r#"
            [chat.profiles.work]
            region = "eu-west-1"
            token_env = "WORK_BEDROCK_KEY"
            "#,
        )
        .unwrap();

        let resolved = config.chat.resolve(Some("work")).unwrap();
        assert_eq!(resolved.region, "eu-west-1");
        assert_eq!(resolved.token_env, "WORK_BEDROCK_KEY");
        assert_eq!(resolved.model_id, "amazon.nova-lite-v1:0");

        let plain = config.chat.resolve(None).unwrap();
        assert_eq!(plain.region, "us-east-1");

        assert!(config.chat.resolve(Some("missing")).is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back.chat.max_new_tokens, 1000);
    }
}
