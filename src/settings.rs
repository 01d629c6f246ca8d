use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration.
///
/// Sources, lowest precedence first: built-in defaults, an optional TOML
/// file, then `CAROUSEL__`-prefixed environment variables using `__` as the
/// section separator (e.g. `CAROUSEL__AI__API_KEY`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub mongodb: MongoSettings,
    pub ai: AiSettings,
    /// Render storage; screenshot uploads are refused when absent.
    #[serde(default)]
    pub storage: Option<StorageSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub bind: String,
    /// Directory served for any path no route matches (admin assets).
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Store the built-in category profiles on startup when missing.
    pub seed_categories: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    /// Custom endpoint for MinIO / LocalStack.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Public base URL of the bucket. Renders are proxied through
    /// `/api/renders/` when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Settings {
    /// Builder pre-populated with the defaults.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.bind", "0.0.0.0:3000")?
            .set_default("server.seed_categories", true)?
            .set_default("mongodb.uri", "mongodb://localhost:27017")?
            .set_default("mongodb.database", "carousel_studio")?
            .set_default("ai.base_url", "https://api.openai.com/v1")?
            .set_default("ai.model", "gpt-4o-mini")?
            .set_default("ai.temperature", 0.7)?
            .set_default("ai.max_tokens", 2048)?
            .set_default("ai.timeout_secs", 60)
    }

    /// Load defaults, the optional file at `path`, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("CAROUSEL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::builder()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.server.bind, "0.0.0.0:3000");
        assert!(settings.server.seed_categories);
        assert_eq!(settings.mongodb.database, "carousel_studio");
        assert_eq!(settings.ai.max_tokens, 2048);
        assert!(settings.ai.api_key.is_empty());
        assert!(settings.storage.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = from_toml(
            r#"
            [ai]
            model = "gemini-2.0-flash"
            base_url = "https://generativelanguage.googleapis.com/v1beta/openai"

            [storage]
            bucket = "renders"
            endpoint = "http://localhost:9000"
            "#,
        );
        assert_eq!(settings.ai.model, "gemini-2.0-flash");
        assert_eq!(settings.ai.timeout_secs, 60);

        let storage = settings.storage.unwrap();
        assert_eq!(storage.bucket, "renders");
        assert_eq!(storage.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(storage.public_base_url.is_none());
    }
}
