//! Heuristic field extraction from a markdown table row.
//!
//! Each field is an independent first-match-wins scan over the pipe
//! separated cells of the line (the link rule scans the whole line). The
//! keyword lists are incomplete on purpose and expected to be tuned; a miss
//! only leaves a field at [`UNKNOWN`], which the digest handles.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{RegionConfig, UNKNOWN};

/// Bracketed text containing one of these is an action link, not a company.
const COMPANY_REJECTS: [&str; 3] = ["apply", "link", "posting"];

/// Lowercase fragments that identify the role cell.
const ROLE_KEYWORDS: [&str; 6] = ["intern", "engineer", "developer", "software", "swe", "co-op"];

/// Month abbreviations that identify the date cell (case-sensitive).
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Cleaned locations longer than this many characters are treated as prose.
const MAX_LOCATION_LEN: usize = 50;

/// Fields pulled out of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub company: String,
    pub role: String,
    pub location: String,
    pub date_posted: String,
    pub link: String,
}

impl Default for ExtractedFields {
    fn default() -> Self {
        Self {
            company: UNKNOWN.to_string(),
            role: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
            date_posted: UNKNOWN.to_string(),
            link: String::new(),
        }
    }
}

/// Extracts posting fields from candidate lines.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    /// Lowercased gazetteer; `None` disables location extraction
    gazetteer: Option<Vec<String>>,
}

impl FieldExtractor {
    pub fn new(region: &RegionConfig) -> Self {
        let gazetteer = region.extract_location.then(|| {
            region
                .gazetteer
                .iter()
                .map(|place| place.trim().to_lowercase())
                .filter(|place| !place.is_empty())
                .collect::<Vec<_>>()
        });
        Self { gazetteer }
    }

    /// Run every rule against the line.
    pub fn extract(&self, line: &str) -> ExtractedFields {
        let cells = split_cells(line);
        let mut fields = ExtractedFields::default();

        if let Some(company) = find_company(&cells) {
            fields.company = company;
        }
        if let Some(role) = find_role(&cells) {
            fields.role = role;
        }
        if let Some(location) = self.find_location(&cells) {
            fields.location = location;
        }
        if let Some(date) = find_date(&cells) {
            fields.date_posted = date;
        }
        if let Some(link) = find_link(line) {
            fields.link = link;
        }

        fields
    }

    /// First cell naming a gazetteer place.
    ///
    /// Short entries like "bc" also match inside unrelated words, and a long
    /// description cell can mention a city; the length cap filters the
    /// latter, and scanning continues past rejected cells.
    fn find_location(&self, cells: &[&str]) -> Option<String> {
        let gazetteer = self.gazetteer.as_ref()?;
        cells
            .iter()
            .filter(|cell| {
                let lower = cell.to_lowercase();
                gazetteer.iter().any(|place| lower.contains(place.as_str()))
            })
            .map(|cell| clean_cell(cell))
            .find(|location| {
                !location.is_empty() && location.graphemes(true).count() <= MAX_LOCATION_LEN
            })
    }
}

/// Split a table row on `|`, trimming and dropping empty cells.
fn split_cells(line: &str) -> Vec<&str> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Drop link brackets and any parenthesised suffix.
fn clean_cell(cell: &str) -> String {
    let unbracketed: String = cell.chars().filter(|c| *c != '[' && *c != ']').collect();
    let head = unbracketed
        .split_once('(')
        .map_or(unbracketed.as_str(), |(head, _)| head);
    head.trim().to_string()
}

/// First linked cell whose label is not an action word.
///
/// Misses companies listed as plain text (no link) and takes the first
/// linked label even when a row links several things.
fn find_company(cells: &[&str]) -> Option<String> {
    cells
        .iter()
        .filter(|cell| cell.contains('[') && cell.contains(']') && cell.contains("http"))
        .filter_map(|cell| bracketed_label(cell))
        .find(|label| {
            let lower = label.to_lowercase();
            !label.is_empty() && !COMPANY_REJECTS.iter().any(|r| lower.contains(r))
        })
        .map(str::to_string)
}

/// Text between the first `[` and the next `]`.
fn bracketed_label(cell: &str) -> Option<&str> {
    let (_, after_open) = cell.split_once('[')?;
    let (label, _) = after_open.split_once(']')?;
    Some(label)
}

/// First cell mentioning a role keyword.
///
/// A company name containing "software" or "engineer" wins over the real
/// role cell when it comes first.
fn find_role(cells: &[&str]) -> Option<String> {
    let cell = cells.iter().find(|cell| {
        let lower = cell.to_lowercase();
        ROLE_KEYWORDS.iter().any(|k| lower.contains(k))
    })?;
    let role = clean_cell(cell);
    (!role.is_empty()).then_some(role)
}

/// First cell that looks like a date.
///
/// Any `/` or `-` qualifies, so hyphenated roles ("Co-op") can be taken
/// for dates. Cells carrying a URL are skipped since every link has a `/`.
fn find_date(cells: &[&str]) -> Option<String> {
    cells
        .iter()
        .filter(|cell| !cell.contains("http"))
        .find(|cell| {
            MONTHS.iter().any(|m| cell.contains(m)) || cell.contains('/') || cell.contains('-')
        })
        .map(|cell| cell.trim().to_string())
}

/// First URL on the line, ended by `)`, else a space, else end of line.
fn find_link(line: &str) -> Option<String> {
    let start = line.find("http")?;
    let rest = &line[start..];
    let end = rest.find(')').or_else(|| rest.find(' ')).unwrap_or(rest.len());
    let link = rest[..end].trim();
    (!link.is_empty()).then(|| link.to_string())
}
