use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the intelligence service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub feed: FeedConfig,
    pub quiz: QuizConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub bind: String,
}

/// Text model settings; the model is only used when `api_key` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub default_limit: usize,
    pub trend_weights: TrendWeights,
}

/// Per-unit contribution of popularity counters to a video's score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrendWeights {
    pub views: f64,
    pub likes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    pub seed_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "bitesize-intelligence".to_string(),
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 8000,
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

impl ModelConfig {
    /// Get model timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: 15,
            trend_weights: TrendWeights::default(),
        }
    }
}

impl Default for TrendWeights {
    fn default() -> Self {
        Self {
            views: 0.001,
            likes: 0.01,
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self { question_count: 3 }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        if dotenvy::dotenv().is_ok() {
            tracing::info!("Loaded .env from working directory");
        } else {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("BITESIZE_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(&config_path);
        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(bind) = lookup("BITESIZE_HTTP_BIND") {
            self.server.bind = bind;
        }

        // Model overrides
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.model.api_key = Some(api_key);
        }
        if let Some(model) = lookup("BITESIZE_MODEL") {
            self.model.model = model;
        }
        if let Some(url) = lookup("BITESIZE_MODEL_URL") {
            self.model.api_url = url;
        }
        if let Some(timeout) = lookup("BITESIZE_MODEL_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.model.timeout_ms = ms;
            }
        }

        // Feed overrides
        if let Some(limit) = lookup("BITESIZE_FEED_LIMIT") {
            if let Ok(limit) = limit.parse() {
                self.feed.default_limit = limit;
            }
        }

        // Catalog overrides
        if let Some(path) = lookup("BITESIZE_CATALOG_PATH") {
            self.catalog.seed_path = Some(path);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.feed.default_limit == 0 {
            return Err("feed.default_limit must be at least 1".into());
        }

        let w = self.feed.trend_weights;
        for (name, val) in [("views", w.views), ("likes", w.likes)] {
            if !val.is_finite() || val < 0.0 {
                return Err(
                    format!("feed.trend_weights.{name} must be a non-negative number").into(),
                );
            }
        }

        if self.model.timeout_ms == 0 {
            return Err("model.timeout_ms cannot be 0".into());
        }

        if self.quiz.question_count == 0 {
            return Err("quiz.question_count must be at least 1".into());
        }

        if self.model_api_key().is_none() {
            return Err(
                "OPENAI_API_KEY not set - summaries, quizzes and feeds use deterministic fallbacks"
                    .into(),
            );
        }

        Ok(())
    }

    /// API key if one is actually configured
    pub fn model_api_key(&self) -> Option<&str> {
        self.model
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.feed.default_limit, 15);
        assert!((cfg.feed.trend_weights.views - 0.001).abs() < 1e-12);
        assert!((cfg.feed.trend_weights.likes - 0.01).abs() < 1e-12);
        assert_eq!(cfg.quiz.question_count, 3);
        assert_eq!(cfg.model.model, "gpt-4o-mini");
        assert!(cfg.model_api_key().is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
model:
  model: "gpt-4o"
  timeout_ms: 2500
feed:
  default_limit: 5
"#;
        let cfg: Config = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(cfg.model.model, "gpt-4o");
        assert_eq!(cfg.model.timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.feed.default_limit, 5);
        assert_eq!(cfg.feed.trend_weights, TrendWeights::default());
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("BITESIZE_MODEL_TIMEOUT_MS", "1200"),
            ("BITESIZE_FEED_LIMIT", "not-a-number"),
            ("BITESIZE_CATALOG_PATH", "seeds/videos.yaml"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.model_api_key(), Some("sk-test"));
        assert_eq!(cfg.model.timeout_ms, 1200);
        // Unparseable values leave the previous setting in place
        assert_eq!(cfg.feed.default_limit, 15);
        assert_eq!(cfg.catalog.seed_path.as_deref(), Some("seeds/videos.yaml"));
    }

    #[test]
    fn test_blank_api_key_is_unconfigured() {
        let mut cfg = Config::default();
        cfg.model.api_key = Some("   ".to_string());
        assert!(cfg.model_api_key().is_none());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut cfg = Config::default();
        cfg.model.api_key = Some("sk-test".to_string());
        assert!(cfg.validate().is_ok());

        cfg.feed.default_limit = 0;
        assert!(cfg.validate().is_err());
    }
}
