//! Document suppliers.
//!
//! A supplier turns a source identifier into document text. Failures stay
//! on this side of the pipeline: [`fetch_documents`] logs them and leaves
//! the source out of the batch instead of aborting the run.

mod file;
mod github;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::SourceDocument;

pub use file::LocalFileSupplier;
pub use github::GithubSupplier;

/// Trait for document sources.
#[async_trait]
pub trait DocumentSupplier: Send + Sync {
    /// Fetch the current content of a source.
    ///
    /// `Ok(None)` means the source was deliberately skipped (e.g. nothing
    /// changed recently); errors are per-source fetch failures.
    async fn fetch(&self, source: &str) -> Result<Option<String>>;
}

/// Fetch all sources with bounded concurrency, keeping input order.
///
/// Sources that fail, are skipped, or return blank content are left out.
pub async fn fetch_documents(
    supplier: &dyn DocumentSupplier,
    sources: &[String],
    concurrency: usize,
) -> Vec<SourceDocument> {
    let results: Vec<_> = stream::iter(sources)
        .map(|source| async move { (source, supplier.fetch(source).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut documents = Vec::with_capacity(results.len());
    for (source, result) in results {
        match result {
            Ok(Some(content)) if !content.trim().is_empty() => {
                log::info!("Fetched {} ({} bytes)", source, content.len());
                documents.push(SourceDocument::new(source.as_str(), content));
            }
            Ok(Some(_)) => log::warn!("{} returned no content", source),
            Ok(None) => log::info!("Skipping {}", source),
            Err(error) => log::warn!("Failed to fetch {}: {}", source, error),
        }
    }
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::error::AppError;

    /// Serves canned content; sources listed in `delays_ms` answer late.
    struct StubSupplier {
        content: HashMap<&'static str, Option<&'static str>>,
        delays_ms: HashMap<&'static str, u64>,
    }

    #[async_trait]
    impl DocumentSupplier for StubSupplier {
        async fn fetch(&self, source: &str) -> Result<Option<String>> {
            if let Some(ms) = self.delays_ms.get(source) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            match self.content.get(source) {
                Some(content) => Ok(content.map(str::to_string)),
                None => Err(AppError::fetch(source, "404 Not Found")),
            }
        }
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_and_skips_are_dropped() {
        let supplier = StubSupplier {
            content: HashMap::from([
                ("a/one", Some("| [A](http://a.com) | Canada |")),
                ("a/quiet", None),
                ("a/blank", Some("   \n")),
            ]),
            delays_ms: HashMap::new(),
        };

        let docs = fetch_documents(
            &supplier,
            &sources(&["a/one", "a/missing", "a/quiet", "a/blank"]),
            2,
        )
        .await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "a/one");
    }

    #[tokio::test]
    async fn test_order_is_preserved_under_concurrency() {
        let supplier = StubSupplier {
            content: HashMap::from([
                ("a/slow", Some("slow")),
                ("a/fast", Some("fast")),
                ("a/mid", Some("mid")),
            ]),
            delays_ms: HashMap::from([("a/slow", 50), ("a/mid", 10)]),
        };

        let docs = fetch_documents(&supplier, &sources(&["a/slow", "a/fast", "a/mid"]), 3).await;
        let order: Vec<&str> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(order, vec!["a/slow", "a/fast", "a/mid"]);
    }
}
