// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser crawl behavior and page selectors
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Batch artifact location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding and vector index settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer generation settings
    #[serde(default)]
    pub answer: AnswerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if self.crawler.wait_timeout_secs == 0 {
            return Err(AppError::validation("crawler.wait_timeout_secs must be > 0"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.container_selector.trim().is_empty()
            || self.crawler.card_selector.trim().is_empty()
            || self.crawler.next_selector.trim().is_empty()
        {
            return Err(AppError::validation("crawler selectors must not be empty"));
        }
        if self.crawler.hotel_path_marker.trim().is_empty() {
            return Err(AppError::validation("crawler.hotel_path_marker is empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(AppError::validation("storage.data_dir is empty"));
        }
        if self.retrieval.top_k == 0 {
            return Err(AppError::validation("retrieval.top_k must be > 0"));
        }
        Ok(())
    }
}

/// Browser crawl behavior and page selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum listing pages visited per crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Bound on waiting for the review container to render
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after a next-page click so the client-side re-render lands
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Selector for the review list container
    #[serde(default = "default_container_selector")]
    pub container_selector: String,

    /// Selector for a single review card
    #[serde(default = "default_card_selector")]
    pub card_selector: String,

    /// Selector for the next-page control
    #[serde(default = "default_next_selector")]
    pub next_selector: String,

    /// Path segment preceding the hotel identifier in listing URLs
    #[serde(default = "default_hotel_path_marker")]
    pub hotel_path_marker: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            wait_timeout_secs: default_wait_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            container_selector: default_container_selector(),
            card_selector: default_card_selector(),
            next_selector: default_next_selector(),
            hotel_path_marker: default_hotel_path_marker(),
        }
    }
}

/// Batch artifact location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one batch artifact per hotel
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Embedding and vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Base URL of the Ollama endpoint
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    /// Embedding model name
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Directory holding one index artifact per collection
    #[serde(default = "default_db_dir")]
    pub db_dir: String,

    /// Number of documents retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// In-flight embedding requests while building an index
    #[serde(default = "default_embed_concurrency")]
    pub embed_concurrency: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            ollama_host: default_ollama_host(),
            embed_model: default_embed_model(),
            db_dir: default_db_dir(),
            top_k: default_top_k(),
            embed_concurrency: default_embed_concurrency(),
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Generation model name
    #[serde(default = "default_answer_model")]
    pub model: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            model: default_answer_model(),
        }
    }
}

fn default_max_pages() -> usize {
    8
}

fn default_wait_timeout_secs() -> u64 {
    15
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
        .to_string()
}

fn default_container_selector() -> String {
    "[data-testid='review-cards']".to_string()
}

fn default_card_selector() -> String {
    "[data-testid='review-card']".to_string()
}

fn default_next_selector() -> String {
    "button[aria-label='Next page']".to_string()
}

fn default_hotel_path_marker() -> String {
    "/pt/".to_string()
}

fn default_data_dir() -> String {
    "data/bookings".to_string()
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_embed_model() -> String {
    "mxbai-embed-large".to_string()
}

fn default_db_dir() -> String {
    "vector_db".to_string()
}

fn default_top_k() -> usize {
    20
}

fn default_embed_concurrency() -> usize {
    4
}

fn default_answer_model() -> String {
    "llama3.2:1b".to_string()
}
