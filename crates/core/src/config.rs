//! Configuration management for FAQ Bot.
//!
//! Configuration is loaded once at start-up and passed explicitly to the
//! clients that need it. Sources, lowest precedence first:
//! - Built-in defaults
//! - YAML config file (`--config`, `FAQ_CONFIG`, or `./faq.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "faq.yaml";

/// Providers the generation client factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "google"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file the values were merged from, if any
    pub config_file: Option<PathBuf>,

    /// Search backend settings
    pub search: SearchConfig,

    /// Generation API settings
    pub llm: LlmConfig,

    /// Credential for the generation API, read from `llm.api_key_env`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Optional YAML file overriding the prompt templates
    pub prompt_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Search backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch node
    pub endpoint: String,

    /// Index holding the FAQ documents
    pub index: String,

    /// Maximum number of documents retrieved per question
    pub max_results: usize,

    /// Course tag every retrieved document must carry
    pub course: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            index: "course-questions".to_string(),
            max_results: 5,
            course: "data-engineering-zoomcamp".to_string(),
        }
    }
}

/// Generation API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmConfig {
    /// Provider identifier (e.g., "gemini")
    pub provider: String,

    /// Model identifier, with or without the `models/` prefix
    pub model: String,

    /// Base URL of the generation API
    pub endpoint: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Sampling temperature (0.0 - 2.0); provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Cap on generated tokens; provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchConfig>,
    llm: Option<LlmConfig>,
    prompt: Option<PromptFileConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptFileConfig {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
            api_key: None,
            prompt_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// When `config_file` is `None`, `./faq.yaml` is used if it exists.
    ///
    /// Environment variables:
    /// - `FAQ_MODEL`: Model identifier
    /// - `FAQ_PROMPT_FILE`: Prompt template file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    /// - the variable named by `llm.apiKeyEnv` (default `GEMINI_API_KEY`): API key
    ///
    /// # Example
    /// ```no_run
    /// use faq_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Search endpoint: {}", config.search.endpoint);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                Self::from_yaml_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_yaml_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("FAQ_MODEL") {
            config.llm.model = model;
        }

        if let Ok(prompt_file) = std::env::var("FAQ_PROMPT_FILE") {
            config.prompt_file = Some(PathBuf::from(prompt_file));
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        // The credential is read exactly once, here.
        config.api_key = std::env::var(&config.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(config)
    }

    /// Build a configuration from a YAML file on top of the defaults.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config = Self::from_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.config_file = Some(path.to_path_buf());

        tracing::debug!("Loaded config file {:?}", path);
        Ok(config)
    }

    /// Parse YAML configuration text on top of the defaults.
    pub fn from_yaml_str(contents: &str) -> AppResult<Self> {
        let mut result = Self::default();

        // An empty file deserializes to `null`
        let config_file: Option<ConfigFile> = serde_yaml::from_str(contents)?;
        let config_file = config_file.unwrap_or_default();

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(llm) = config_file.llm {
            result.llm = llm;
        }

        if let Some(prompt) = config_file.prompt {
            result.prompt_file = prompt.file;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the configuration before any client is built.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.llm.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier cannot be empty".to_string()));
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::Config(format!(
                    "llm.temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }

        if self.llm.max_tokens == Some(0) {
            return Err(AppError::Config(
                "llm.maxTokens must be at least 1".to_string(),
            ));
        }

        if self.search.index.trim().is_empty() {
            return Err(AppError::Config("Search index cannot be empty".to_string()));
        }

        if self.search.max_results == 0 {
            return Err(AppError::Config(
                "search.maxResults must be at least 1".to_string(),
            ));
        }

        if !self.search.endpoint.starts_with("http://")
            && !self.search.endpoint.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "Search endpoint must be an http(s) URL: {}",
                self.search.endpoint
            )));
        }

        Ok(())
    }
}
