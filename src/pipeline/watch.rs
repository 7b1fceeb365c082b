// src/pipeline/watch.rs

//! One watch run: fetch, scan, deliver, persist.

use chrono::Utc;

use crate::digest::DigestFormatter;
use crate::error::Result;
use crate::models::{Config, PostingRecord, SourceDocument};
use crate::notify::{self, Notifier};
use crate::pipeline::scan::PostingPipeline;
use crate::sources::{DocumentSupplier, fetch_documents};
use crate::storage::SeenStore;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    /// Render the digest but neither deliver it nor save the seen set
    pub dry_run: bool,
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct WatchOutcome {
    /// Documents that made it into the scan
    pub documents: usize,
    /// Postings reported by this run
    pub records: Vec<PostingRecord>,
    pub delivered: bool,
    pub saved: bool,
}

/// Fetch every source in `sources` and process the resulting documents.
pub async fn run_watch(
    config: &Config,
    sources: &[String],
    supplier: &dyn DocumentSupplier,
    store: &dyn SeenStore,
    notifier: &dyn Notifier,
    options: WatchOptions,
) -> Result<WatchOutcome> {
    log::info!("Checking {} sources...", sources.len());
    let documents = fetch_documents(supplier, sources, config.crawler.max_concurrent).await;
    log::info!("Fetched {}/{} sources", documents.len(), sources.len());

    process_documents(config, &documents, store, notifier, options).await
}

/// Scan already-fetched documents, deliver the digest and save the seen set.
///
/// The seen set is saved exactly once per run, even when nothing is new, so
/// an unreadable file is replaced. With new postings the save by default
/// happens after a successful delivery, so a failed delivery is retried on the next run;
/// with `storage.save_before_delivery` it happens first, trading a possibly
/// lost digest for never reporting a posting twice.
pub async fn process_documents(
    config: &Config,
    documents: &[SourceDocument],
    store: &dyn SeenStore,
    notifier: &dyn Notifier,
    options: WatchOptions,
) -> Result<WatchOutcome> {
    let mut seen = store.load().await;
    let pipeline = PostingPipeline::new(&config.region);
    let records = pipeline.run(documents, &mut seen, Utc::now());

    let mut outcome = WatchOutcome {
        documents: documents.len(),
        ..WatchOutcome::default()
    };

    if records.is_empty() {
        log::info!("No new postings found");
        if !options.dry_run {
            store.save(&seen).await?;
            outcome.saved = true;
        }
        return Ok(outcome);
    }
    log::info!("Found {} new postings", records.len());

    let digest = DigestFormatter::new(&config.region, config.notify.format).digest(&records);
    outcome.records = records;

    if options.dry_run {
        log::info!("Dry run, not delivering or saving:\n{}\n\n{}", digest.subject, digest.body);
        return Ok(outcome);
    }

    if config.storage.save_before_delivery {
        store.save(&seen).await?;
        outcome.saved = true;
    }

    outcome.delivered = match notify::dispatch(notifier, &digest, &config.notify.recipients).await
    {
        Ok(delivered) => delivered,
        Err(e) => {
            log::error!(
                "Delivery via {} failed for {} postings: {}",
                notifier.name(),
                digest.count,
                e
            );
            return Err(e);
        }
    };

    if !outcome.saved {
        store.save(&seen).await?;
        outcome.saved = true;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::notify::testing::RecordingNotifier;
    use crate::pipeline::identity::posting_id;
    use crate::sources::LocalFileSupplier;
    use crate::storage::{LocalSeenStore, MemorySeenStore, SeenSet};
    use tempfile::TempDir;

    const REPO_A: &str = "| [Acme](http://acme.com/apply) | SWE Intern | Toronto, Canada | Jan 5 |\n| prose line unrelated |";

    /// Temp dir holding one file per source.
    fn workspace(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(tmp.path().join(name), content).unwrap();
        }
        tmp
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_dedup_converges_across_runs() {
        let tmp = workspace(&[("repoA", REPO_A)]);
        let supplier = LocalFileSupplier::new(tmp.path());
        let store = LocalSeenStore::new(tmp.path().join("seen.json"));
        let notifier = RecordingNotifier::default();
        let config = Config::default();
        let sources = sources(&["repoA"]);

        let first = run_watch(&config, &sources, &supplier, &store, &notifier, WatchOptions::default())
            .await
            .unwrap();
        assert_eq!(first.records.len(), 1);
        assert!(first.delivered);
        assert!(first.saved);
        assert_eq!(first.records[0].company, "Acme");

        let second = run_watch(&config, &sources, &supplier, &store, &notifier, WatchOptions::default())
            .await
            .unwrap();
        assert!(second.records.is_empty());
        assert!(!second.delivered);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_failed_source_does_not_abort_run() {
        let tmp = workspace(&[("repoA", REPO_A)]);
        let supplier = LocalFileSupplier::new(tmp.path());
        let store = MemorySeenStore::new();
        let notifier = RecordingNotifier::default();

        let outcome = run_watch(
            &Config::default(),
            &sources(&["missing", "repoA"]),
            &supplier,
            &store,
            &notifier,
            WatchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.documents, 1);
        assert_eq!(outcome.records.len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_new_skips_delivery_but_saves_once() {
        let store = MemorySeenStore::new();
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", "| prose line unrelated |")];

        let outcome =
            process_documents(&Config::default(), &docs, &store, &notifier, WatchOptions::default())
                .await
                .unwrap();

        assert!(outcome.records.is_empty());
        assert!(!outcome.delivered);
        assert!(outcome.saved);
        assert_eq!(notifier.count(), 0);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_previously_seen_posting_is_not_reported() {
        let first_line = REPO_A.lines().next().unwrap();
        let mut seen = SeenSet::new();
        seen.record(posting_id("repoA", first_line), Utc::now());
        let store = MemorySeenStore::with_seen(seen);
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", REPO_A)];

        let outcome =
            process_documents(&Config::default(), &docs, &store, &notifier, WatchOptions::default())
                .await
                .unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(notifier.count(), 0);
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_seen_file_is_rewritten_without_new_postings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = LocalSeenStore::new(&path);
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", "| prose line unrelated |")];

        process_documents(&Config::default(), &docs, &store, &notifier, WatchOptions::default())
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let seen: SeenSet = serde_json::from_str(&content).unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_without_new_postings_does_not_save() {
        let store = MemorySeenStore::new();
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", "| prose line unrelated |")];

        let outcome = process_documents(
            &Config::default(),
            &docs,
            &store,
            &notifier,
            WatchOptions { dry_run: true },
        )
        .await
        .unwrap();

        assert!(!outcome.saved);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_postings_unseen() {
        let store = MemorySeenStore::new();
        let docs = vec![SourceDocument::new("repoA", REPO_A)];
        let config = Config::default();

        let failing = RecordingNotifier::failing();
        let result =
            process_documents(&config, &docs, &store, &failing, WatchOptions::default()).await;
        assert!(matches!(result, Err(AppError::Delivery(_))));
        assert_eq!(store.save_count(), 0);

        let working = RecordingNotifier::default();
        let retry = process_documents(&config, &docs, &store, &working, WatchOptions::default())
            .await
            .unwrap();
        assert_eq!(retry.records.len(), 1);
        assert_eq!(working.count(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_save_before_delivery_marks_seen_even_on_failure() {
        let store = MemorySeenStore::new();
        let docs = vec![SourceDocument::new("repoA", REPO_A)];
        let mut config = Config::default();
        config.storage.save_before_delivery = true;

        let failing = RecordingNotifier::failing();
        let result =
            process_documents(&config, &docs, &store, &failing, WatchOptions::default()).await;
        assert!(result.is_err());
        assert_eq!(store.save_count(), 1);

        let working = RecordingNotifier::default();
        let retry = process_documents(&config, &docs, &store, &working, WatchOptions::default())
            .await
            .unwrap();
        assert!(retry.records.is_empty());
        assert_eq!(working.count(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_neither_delivers_nor_saves() {
        let store = MemorySeenStore::new();
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", REPO_A)];

        let outcome = process_documents(
            &Config::default(),
            &docs,
            &store,
            &notifier,
            WatchOptions { dry_run: true },
        )
        .await
        .unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert!(!outcome.delivered);
        assert!(!outcome.saved);
        assert_eq!(notifier.count(), 0);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delivered_digest_lists_postings() {
        let store = MemorySeenStore::new();
        let notifier = RecordingNotifier::default();
        let docs = vec![SourceDocument::new("repoA", REPO_A)];

        process_documents(&Config::default(), &docs, &store, &notifier, WatchOptions::default())
            .await
            .unwrap();

        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].count, 1);
        assert!(delivered[0].body.contains("Company: Acme"));
        assert!(delivered[0].body.contains("Source: repoA"));
    }
}
