//! Candidate line classification.
//!
//! A line is a candidate when it mentions the target region AND looks like
//! a row of a postings table. Both checks are plain substring tests so a
//! README with thousands of lines is filtered without parsing it.

use crate::models::RegionConfig;

/// Decides whether a line is worth handing to the extractor.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    /// Lowercased region keywords
    keywords: Vec<String>,
    /// Exact region markers (flags, emoji)
    markers: Vec<String>,
}

impl LineClassifier {
    pub fn new(region: &RegionConfig) -> Self {
        Self {
            keywords: region
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            markers: region
                .markers
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// True when the line carries a region signal and a table-row signal.
    pub fn is_candidate(&self, line: &str) -> bool {
        self.mentions_region(line) && looks_like_row(line)
    }

    fn mentions_region(&self, line: &str) -> bool {
        if self.markers.iter().any(|m| line.contains(m.as_str())) {
            return true;
        }
        let lower = line.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// A link or a markdown link opener separates table rows from prose.
fn looks_like_row(line: &str) -> bool {
    line.contains("http") || line.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new(&RegionConfig::default())
    }

    #[test]
    fn test_keyword_and_link() {
        let c = classifier();
        assert!(c.is_candidate("| [Acme](http://acme.com) | Intern | Toronto, Canada |"));
        assert!(c.is_candidate("| Acme | Intern | CANADA | http://acme.com |"));
    }

    #[test]
    fn test_flag_marker_counts_as_region() {
        let c = classifier();
        assert!(c.is_candidate("| [Acme] | Intern | 🇨🇦 |"));
    }

    #[test]
    fn test_requires_row_signal() {
        let c = classifier();
        assert!(!c.is_candidate("We love interns from Canada!"));
    }

    #[test]
    fn test_requires_region_signal() {
        let c = classifier();
        assert!(!c.is_candidate("| [Acme](http://acme.com) | Intern | Seattle, WA |"));
        assert!(!c.is_candidate("| prose line unrelated |"));
    }

    #[test]
    fn test_is_deterministic() {
        let c = classifier();
        let line = "| [Acme](http://acme.com) | Intern | Canada |";
        let first = c.is_candidate(line);
        for _ in 0..3 {
            assert_eq!(c.is_candidate(line), first);
        }
    }

    #[test]
    fn test_custom_region() {
        let region = RegionConfig {
            keywords: vec!["Germany".to_string()],
            markers: vec!["🇩🇪".to_string()],
            ..RegionConfig::default()
        };
        let c = LineClassifier::new(&region);
        assert!(c.is_candidate("| [Acme](http://a.de) | Berlin, germany |"));
        assert!(c.is_candidate("| [Acme] | 🇩🇪 |"));
        assert!(!c.is_candidate("| [Acme](http://a.ca) | Toronto, Canada |"));
    }
}
