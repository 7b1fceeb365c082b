// src/digest.rs

//! Digest rendering.
//!
//! Turns a batch of new postings into a report body (plain text or HTML)
//! and a subject line. An empty batch renders as [`NOTHING_TO_REPORT`],
//! which notifiers must never send.

use std::fmt::Write;

use crate::models::{DigestFormat, PostingRecord, RegionConfig, UNKNOWN};

/// Body of a digest with no postings.
pub const NOTHING_TO_REPORT: &str = "NOTHING_TO_REPORT";

/// A rendered report ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
    pub format: DigestFormat,
    /// Number of postings in the body
    pub count: usize,
}

impl Digest {
    /// True for the "do not send" sentinel.
    pub fn is_nothing_to_report(&self) -> bool {
        self.count == 0 || self.body == NOTHING_TO_REPORT
    }
}

/// Renders posting batches.
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    format: DigestFormat,
    region: String,
    marker: Option<String>,
}

impl DigestFormatter {
    pub fn new(region: &RegionConfig, format: DigestFormat) -> Self {
        Self {
            format,
            region: region.name.clone(),
            marker: region.markers.iter().find(|m| !m.is_empty()).cloned(),
        }
    }

    /// Render the subject and body for a batch.
    pub fn digest(&self, records: &[PostingRecord]) -> Digest {
        Digest {
            subject: self.subject(records),
            body: self.format(records),
            format: self.format,
            count: records.len(),
        }
    }

    /// Render the body, or the sentinel for an empty batch.
    pub fn format(&self, records: &[PostingRecord]) -> String {
        if records.is_empty() {
            return NOTHING_TO_REPORT.to_string();
        }
        match self.format {
            DigestFormat::Text => self.format_text(records),
            DigestFormat::Html => self.format_html(records),
        }
    }

    /// Subject line, dated by the batch's extraction time.
    pub fn subject(&self, records: &[PostingRecord]) -> String {
        let mut subject = String::new();
        if let Some(marker) = &self.marker {
            subject.push_str(marker);
            subject.push(' ');
        }
        let _ = write!(
            subject,
            "{} New {} Posting{}",
            records.len(),
            self.region,
            plural(records.len())
        );
        if let Some(first) = records.first() {
            let _ = write!(subject, " - {}", first.found_at.format("%b %d, %Y"));
        }
        subject
    }

    fn format_text(&self, records: &[PostingRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} New {} Internship Posting{}",
            records.len(),
            self.region,
            plural(records.len())
        );
        let _ = writeln!(out, "Found on {}", records[0].found_at.format("%B %d, %Y"));
        out.push('\n');

        for (i, record) in records.iter().enumerate() {
            let _ = writeln!(out, "#{}", i + 1);
            for (label, value) in populated_fields(record) {
                let _ = writeln!(out, "{label}: {value}");
            }
            let _ = writeln!(out, "Source: {}", record.source);
            if record.is_unstructured() {
                let _ = writeln!(out, "Details: {}", record.raw_content);
            }
            out.push('\n');
        }

        out.push_str("Good luck with your applications!");
        out
    }

    fn format_html(&self, records: &[PostingRecord]) -> String {
        let mut out = String::from(HTML_HEAD);
        let _ = writeln!(
            out,
            "<h2>New {} Internship Postings</h2>",
            escape_html(&self.region)
        );
        let _ = writeln!(
            out,
            "<p>Found {} new posting{} on {}:</p>",
            records.len(),
            plural(records.len()),
            records[0].found_at.format("%B %d, %Y")
        );

        for record in records {
            out.push_str("<div class=\"posting\">\n");
            let _ = writeln!(
                out,
                "<div class=\"repo\">From: {}</div>",
                escape_html(&record.source)
            );
            for (label, value) in populated_fields(record) {
                if label == "Apply" {
                    let link = escape_html(value);
                    let _ = writeln!(out, "<div>Apply: <a href=\"{link}\">{link}</a></div>");
                } else {
                    let _ = writeln!(out, "<div>{label}: {}</div>", escape_html(value));
                }
            }
            if record.is_unstructured() {
                let _ = writeln!(out, "<div>{}</div>", escape_html(&record.raw_content));
            }
            out.push_str("</div>\n");
        }

        out.push_str("<p>Good luck with your applications!</p>\n</body>\n</html>\n");
        out
    }
}

const HTML_HEAD: &str = r#"<html>
<head>
<style>
body { font-family: Arial, sans-serif; }
.posting { margin: 15px 0; padding: 10px; border-left: 3px solid #4CAF50; background-color: #f9f9f9; }
.repo { color: #666; font-size: 12px; }
h2 { color: #333; }
</style>
</head>
<body>
"#;

/// Labelled fields that carry extracted values.
fn populated_fields(record: &PostingRecord) -> Vec<(&'static str, &str)> {
    [
        ("Company", record.company.as_str()),
        ("Role", record.role.as_str()),
        ("Location", record.location.as_str()),
        ("Posted", record.date_posted.as_str()),
        ("Apply", record.link.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty() && *value != UNKNOWN)
    .collect()
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
