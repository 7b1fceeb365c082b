//! Application configuration structures.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// GitHub API access settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Repositories to watch
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Target region markers and gazetteer
    #[serde(default)]
    pub region: RegionConfig,

    /// Seen-set persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Digest delivery settings
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    ///
    /// Only for read-only commands; delivery must use [`Config::load`].
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
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.github.lookback_hours == 0 {
            return Err(AppError::validation("github.lookback_hours must be > 0"));
        }
        url::Url::parse(&self.github.api_base)
            .map_err(|e| AppError::validation(format!("github.api_base is invalid: {e}")))?;

        if self.sources.repositories.is_empty() {
            return Err(AppError::validation("No repositories defined"));
        }
        let repo_pattern = Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$")
            .map_err(|e| AppError::config(e.to_string()))?;
        for repo in &self.sources.repositories {
            if !repo_pattern.is_match(repo) {
                return Err(AppError::validation(format!(
                    "Repository '{repo}' is not in owner/name form"
                )));
            }
        }

        if self.region.keywords.iter().all(|k| k.trim().is_empty())
            && self.region.markers.iter().all(|m| m.is_empty())
        {
            return Err(AppError::validation(
                "region needs at least one keyword or marker",
            ));
        }

        if self.storage.seen_file.trim().is_empty() {
            return Err(AppError::validation("storage.seen_file is empty"));
        }

        match self.notify.method {
            NotifyMethod::Console => {}
            NotifyMethod::Outbox | NotifyMethod::Webhook
                if self.notify.recipients.is_empty() =>
            {
                return Err(AppError::validation("notify.recipients is empty"));
            }
            NotifyMethod::Outbox => {}
            NotifyMethod::Webhook => {
                let raw = self
                    .notify
                    .webhook_url
                    .as_deref()
                    .ok_or_else(|| AppError::validation("notify.webhook_url is required"))?;
                url::Url::parse(raw).map_err(|e| {
                    AppError::validation(format!("notify.webhook_url is invalid: {e}"))
                })?;
            }
        }

        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent source fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API root
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Name of the environment variable holding an optional access token
    #[serde(default = "defaults::token_env")]
    pub token_env: String,

    /// How far back to look for commits
    #[serde(default = "defaults::lookback_hours")]
    pub lookback_hours: u32,

    /// Page size for the commit listing
    #[serde(default = "defaults::commits_per_page")]
    pub commits_per_page: u32,

    /// Skip a repository entirely when nothing was committed in the window
    #[serde(default = "defaults::enabled")]
    pub require_recent_commits: bool,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            token_env: defaults::token_env(),
            lookback_hours: defaults::lookback_hours(),
            commits_per_page: defaults::commits_per_page(),
            require_recent_commits: defaults::enabled(),
        }
    }
}

/// Watched repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Repositories in `owner/name` form
    #[serde(default = "defaults::repositories")]
    pub repositories: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            repositories: defaults::repositories(),
        }
    }
}

/// Target region definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Display name used in digest headings
    #[serde(default = "defaults::region_name")]
    pub name: String,

    /// Case-insensitive keywords that mark a line as relevant
    #[serde(default = "defaults::region_keywords")]
    pub keywords: Vec<String>,

    /// Exact sequences (flags, emoji) that mark a line as relevant
    #[serde(default = "defaults::region_markers")]
    pub markers: Vec<String>,

    /// Lowercase city/province names used to pick the location cell
    #[serde(default = "defaults::gazetteer")]
    pub gazetteer: Vec<String>,

    /// Whether to extract a location field at all
    #[serde(default = "defaults::enabled")]
    pub extract_location: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: defaults::region_name(),
            keywords: defaults::region_keywords(),
            markers: defaults::region_markers(),
            gazetteer: defaults::gazetteer(),
            extract_location: defaults::enabled(),
        }
    }
}

/// Seen-set persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON seen-set file
    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,

    /// Persist newly seen ids before attempting delivery
    #[serde(default)]
    pub save_before_delivery: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seen_file: defaults::seen_file(),
            save_before_delivery: false,
        }
    }
}

/// Delivery backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMethod {
    #[default]
    Console,
    Outbox,
    Webhook,
}

/// Digest body format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigestFormat {
    #[default]
    Text,
    Html,
}

impl DigestFormat {
    /// File extension for a rendered body.
    pub fn extension(&self) -> &'static str {
        match self {
            DigestFormat::Text => "txt",
            DigestFormat::Html => "html",
        }
    }
}

/// Digest delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub method: NotifyMethod,

    /// Sender address passed to the relay
    #[serde(default)]
    pub sender: String,

    /// Recipient addresses
    #[serde(default)]
    pub recipients: Vec<String>,

    #[serde(default)]
    pub format: DigestFormat,

    /// Directory for the outbox notifier
    #[serde(default = "defaults::outbox_dir")]
    pub outbox_dir: String,

    /// Relay endpoint for the webhook notifier
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            method: NotifyMethod::default(),
            sender: String::new(),
            recipients: Vec::new(),
            format: DigestFormat::default(),
            outbox_dir: defaults::outbox_dir(),
            webhook_url: None,
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; internwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // GitHub defaults
    pub fn api_base() -> String {
        "https://api.github.com".into()
    }
    pub fn token_env() -> String {
        "GITHUB_TOKEN".into()
    }
    pub fn lookback_hours() -> u32 {
        24
    }
    pub fn commits_per_page() -> u32 {
        10
    }
    pub fn enabled() -> bool {
        true
    }

    pub fn repositories() -> Vec<String> {
        vec![
            "jenndryden/Canadian-Tech-Internships-Summer-2025".into(),
            "SimplifyJobs/Summer2025-Internships".into(),
            "pittcsc/Summer2025-Internships".into(),
            "ReaVNaiL/New-Grad-2025".into(),
        ]
    }

    // Region defaults
    pub fn region_name() -> String {
        "Canadian".into()
    }
    pub fn region_keywords() -> Vec<String> {
        vec!["canada".into()]
    }
    pub fn region_markers() -> Vec<String> {
        vec!["🇨🇦".into()]
    }

    // "bc" and "london" also match unrelated cells (e.g. "London, UK").
    pub fn gazetteer() -> Vec<String> {
        [
            "toronto",
            "vancouver",
            "montreal",
            "ottawa",
            "calgary",
            "edmonton",
            "winnipeg",
            "quebec",
            "hamilton",
            "kitchener",
            "waterloo",
            "london",
            "victoria",
            "halifax",
            "regina",
            "saskatoon",
            "ontario",
            "bc",
            "british columbia",
            "alberta",
            "remote",
            "hybrid",
            "canada",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // Storage defaults
    pub fn seen_file() -> String {
        "seen_postings.json".into()
    }

    // Notify defaults
    pub fn outbox_dir() -> String {
        "outbox".into()
    }
}
