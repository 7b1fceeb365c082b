// src/pipeline/scan.rs

//! Posting pipeline: classify, identify, dedup, extract.

use chrono::{DateTime, Utc};

use crate::models::{CandidateLine, PostingRecord, RegionConfig, SourceDocument};
use crate::pipeline::classify::LineClassifier;
use crate::pipeline::extract::FieldExtractor;
use crate::pipeline::identity::posting_id;
use crate::storage::SeenSet;

/// Per-document counts from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: usize,
    pub candidates: usize,
    pub already_seen: usize,
    pub new_postings: usize,
}

/// Turns source documents into new posting records.
///
/// Performs no I/O: the caller loads the seen set before the run and saves
/// it afterwards.
#[derive(Debug, Clone)]
pub struct PostingPipeline {
    classifier: LineClassifier,
    extractor: FieldExtractor,
}

impl PostingPipeline {
    pub fn new(region: &RegionConfig) -> Self {
        Self {
            classifier: LineClassifier::new(region),
            extractor: FieldExtractor::new(region),
        }
    }

    /// Scan every document in order and return the postings not in `seen`.
    ///
    /// Output keeps document order, then line order. Every returned id is
    /// recorded in `seen` with `now`.
    pub fn run(
        &self,
        documents: &[SourceDocument],
        seen: &mut SeenSet,
        now: DateTime<Utc>,
    ) -> Vec<PostingRecord> {
        let mut records = Vec::new();
        for document in documents {
            let stats = self.scan_document(document, seen, now, &mut records);
            log::info!(
                "{}: {} lines, {} candidates, {} already seen, {} new",
                document.source,
                stats.lines,
                stats.candidates,
                stats.already_seen,
                stats.new_postings
            );
        }
        records
    }

    /// Scan one document, appending new records to `out`.
    pub fn scan_document(
        &self,
        document: &SourceDocument,
        seen: &mut SeenSet,
        now: DateTime<Utc>,
        out: &mut Vec<PostingRecord>,
    ) -> ScanStats {
        let mut stats = ScanStats::default();

        for raw in document.content.lines() {
            stats.lines += 1;
            if !self.classifier.is_candidate(raw) {
                continue;
            }
            stats.candidates += 1;

            let line = CandidateLine::new(&document.source, raw);
            let id = posting_id(line.source, line.content);
            if seen.contains(&id) {
                stats.already_seen += 1;
                continue;
            }

            let record = self.build_record(&line, id, now);
            log::debug!(
                "New posting {}",
                record.format("{company} | {role} | {location} | {link}")
            );
            seen.record(record.id.clone(), now);
            out.push(record);
            stats.new_postings += 1;
        }

        stats
    }

    fn build_record(
        &self,
        line: &CandidateLine<'_>,
        id: String,
        now: DateTime<Utc>,
    ) -> PostingRecord {
        let fields = self.extractor.extract(line.content);
        PostingRecord {
            id,
            source: line.source.to_string(),
            company: fields.company,
            role: fields.role,
            location: fields.location,
            date_posted: fields.date_posted,
            link: fields.link,
            raw_content: line.content.to_string(),
            found_at: now,
        }
    }
}
