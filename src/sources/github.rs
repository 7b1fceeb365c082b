// src/sources/github.rs

//! GitHub README supplier.
//!
//! For each `owner/name` repository, optionally checks whether anything was
//! committed within the lookback window, then downloads the raw README.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::IgnoredAny;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::GithubConfig;
use crate::sources::DocumentSupplier;

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

/// Fetches repository READMEs from the GitHub REST API.
pub struct GithubSupplier {
    client: Client,
    config: GithubConfig,
    token: Option<String>,
}

impl GithubSupplier {
    /// Create a supplier, reading the optional token from the environment
    /// variable named in the config.
    pub fn new(client: Client, config: &GithubConfig) -> Self {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::with_token(client, config, token)
    }

    pub fn with_token(client: Client, config: &GithubConfig, token: Option<String>) -> Self {
        if token.is_none() {
            log::debug!("No GitHub token set, using unauthenticated rate limits");
        }
        Self {
            client,
            config: config.clone(),
            token,
        }
    }

    fn repo_url(&self, repo: &str, path: &str) -> Result<Url> {
        let base = self.config.api_base.trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/repos/{repo}/{path}"))?)
    }

    /// Commit listing URL for everything since `since`.
    fn commits_url(&self, repo: &str, since: DateTime<Utc>) -> Result<Url> {
        let mut url = self.repo_url(repo, "commits")?;
        url.query_pairs_mut()
            .append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("per_page", &self.config.commits_per_page.to_string());
        Ok(url)
    }

    async fn get(&self, repo: &str, url: Url, accept: &str) -> Result<reqwest::Response> {
        let mut request = self.client.get(url).header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }
        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::fetch(repo, e))
    }

    /// Number of commits (up to one page) within the lookback window.
    async fn recent_commit_count(&self, repo: &str) -> Result<usize> {
        let since = Utc::now() - Duration::hours(i64::from(self.config.lookback_hours));
        let url = self.commits_url(repo, since)?;
        let commits: Vec<IgnoredAny> = self
            .get(repo, url, ACCEPT_JSON)
            .await?
            .json()
            .await
            .map_err(|e| AppError::fetch(repo, e))?;
        Ok(commits.len())
    }

    async fn readme(&self, repo: &str) -> Result<String> {
        let url = self.repo_url(repo, "readme")?;
        self.get(repo, url, ACCEPT_RAW)
            .await?
            .text()
            .await
            .map_err(|e| AppError::fetch(repo, e))
    }
}

#[async_trait]
impl DocumentSupplier for GithubSupplier {
    async fn fetch(&self, source: &str) -> Result<Option<String>> {
        if self.config.require_recent_commits {
            let count = self.recent_commit_count(source).await?;
            if count == 0 {
                log::info!(
                    "No commits in {} within the last {}h",
                    source,
                    self.config.lookback_hours
                );
                return Ok(None);
            }
            log::info!("Found {} recent commits in {}", count, source);
        }

        self.readme(source).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn supplier(api_base: &str) -> GithubSupplier {
        let config = GithubConfig {
            api_base: api_base.to_string(),
            ..GithubConfig::default()
        };
        GithubSupplier::with_token(Client::new(), &config, None)
    }

    #[test]
    fn test_readme_url() {
        let s = supplier("https://api.github.com/");
        assert_eq!(
            s.repo_url("acme/jobs", "readme").unwrap().as_str(),
            "https://api.github.com/repos/acme/jobs/readme"
        );
    }

    #[test]
    fn test_commits_url_has_window_and_page_size() {
        let s = supplier("https://api.github.com");
        let since = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let url = s.commits_url("acme/jobs", since).unwrap();

        assert_eq!(url.path(), "/repos/acme/jobs/commits");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("since".to_string(), "2026-01-05T09:00:00Z".to_string()),
                ("per_page".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_api_base() {
        let s = supplier("not a url");
        assert!(s.repo_url("acme/jobs", "readme").is_err());
    }
}
