//! Source documents and the posting records extracted from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for a field the extractor could not find.
pub const UNKNOWN: &str = "Unknown";

/// Text content fetched from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Where the content came from (e.g. `owner/repo`)
    pub source: String,

    /// Raw document text
    pub content: String,
}

impl SourceDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// A document line that passed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateLine<'a> {
    pub source: &'a str,

    /// The line exactly as it appeared in the document
    pub raw: &'a str,

    /// The trimmed line, used for identity and display
    pub content: &'a str,
}

impl<'a> CandidateLine<'a> {
    pub fn new(source: &'a str, raw: &'a str) -> Self {
        Self {
            source,
            raw,
            content: raw.trim(),
        }
    }
}

/// A structured job posting found in a source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostingRecord {
    /// Stable identifier derived from `source` and `raw_content`
    pub id: String,

    /// Originating document
    pub source: String,

    pub company: String,
    pub role: String,
    pub location: String,
    pub date_posted: String,

    /// First link on the line (may be empty)
    pub link: String,

    /// The trimmed line, kept for audit and fallback display
    pub raw_content: String,

    /// When this run extracted the record; not part of identity
    pub found_at: DateTime<Utc>,
}

impl PostingRecord {
    /// True when none of the heuristic fields could be extracted.
    pub fn is_unstructured(&self) -> bool {
        [&self.company, &self.role, &self.location, &self.date_posted]
            .iter()
            .all(|field| field.as_str() == UNKNOWN)
    }

    /// Format the record for display using a template.
    ///
    /// Supported placeholders:
    /// - `{source}`, `{company}`, `{role}`, `{location}`
    /// - `{date}`, `{link}`, `{raw}`, `{id}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{source}", &self.source)
            .replace("{company}", &self.company)
            .replace("{role}", &self.role)
            .replace("{location}", &self.location)
            .replace("{date}", &self.date_posted)
            .replace("{link}", &self.link)
            .replace("{raw}", &self.raw_content)
            .replace("{id}", &self.id)
    }
}
