//! Exclusion Filter
//!
//! Loads a newline-delimited list of wildcard patterns and removes every
//! rule whose citations match any of them.
//!
//! # File Format
//!
//! ```text
//! # Chapters handled by site configuration management
//! 1.1.2.*
//! 5.[12].*
//!
//! 6.1.1
//! ```
//!
//! Blank lines and lines whose first non-whitespace character is `#` are
//! ignored. Every other line is trimmed and used as a pattern.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::glob::Glob;
use super::resolver::CitationMap;

/// A single exclusion pattern with its source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPattern {
    /// 1-based line number in the source list
    pub line: usize,

    glob: Glob,
}

impl ExclusionPattern {
    /// Compile a pattern found on `line`
    pub fn new(line: usize, pattern: &str) -> Self {
        Self {
            line,
            glob: Glob::new(pattern),
        }
    }

    /// The pattern text
    pub fn as_str(&self) -> &str {
        self.glob.as_str()
    }

    /// Whether `citation` matches this pattern in full
    pub fn matches(&self, citation: &str) -> bool {
        self.glob.matches(citation)
    }
}

/// An ordered list of exclusion patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    source: Option<PathBuf>,
    patterns: Vec<ExclusionPattern>,
}

impl ExclusionList {
    /// Create an empty list, which excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Load patterns from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExclusionSourceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ExclusionSourceError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut list = Self::parse(&content);
        list.source = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            patterns = list.patterns.len(),
            "Loaded exclusion patterns"
        );

        Ok(list)
    }

    /// Parse patterns from text, skipping blanks and comments
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let line_text = line.trim();
                if line_text.is_empty() || line_text.starts_with('#') {
                    return None;
                }
                Some(ExclusionPattern::new(i + 1, line_text))
            })
            .collect();

        Self {
            source: None,
            patterns,
        }
    }

    /// Add a pattern programmatically
    pub fn push(&mut self, pattern: &str) {
        let line = self.patterns.last().map(|p| p.line + 1).unwrap_or(1);
        self.patterns.push(ExclusionPattern::new(line, pattern));
    }

    /// File the patterns were loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Patterns in source order
    pub fn patterns(&self) -> &[ExclusionPattern] {
        &self.patterns
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the list has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern matching `citation`, if any
    pub fn first_match(&self, citation: &str) -> Option<&ExclusionPattern> {
        self.patterns.iter().find(|p| p.matches(citation))
    }
}

impl FromIterator<String> for ExclusionList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut list = Self::new();
        for pattern in iter {
            list.push(&pattern);
        }
        list
    }
}

/// Why a rule was removed from the citation map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedRule {
    /// Full rule id
    pub rule_id: String,
    /// First citation that matched
    pub citation: String,
    /// Pattern that matched it
    pub pattern: String,
    /// Line of the pattern in the exclusion list
    pub line: usize,
}

/// Remove every rule with at least one citation matching any pattern
///
/// The result's keys are always a subset of the input's. An empty pattern
/// list returns the input unchanged.
pub fn apply_exclusions(mapping: CitationMap, exclusions: &ExclusionList) -> CitationMap {
    partition_exclusions(mapping, exclusions).0
}

/// Split a citation map into retained entries and removed rules
///
/// A single matching citation removes the whole rule, regardless of its
/// other citations.
pub fn partition_exclusions(
    mapping: CitationMap,
    exclusions: &ExclusionList,
) -> (CitationMap, Vec<ExcludedRule>) {
    if exclusions.is_empty() {
        return (mapping, Vec::new());
    }

    let mut retained = CitationMap::new();
    let mut excluded = Vec::new();

    for (rule_id, citations) in mapping {
        let hit = citations
            .iter()
            .find_map(|c| exclusions.first_match(c).map(|p| (c, p)));

        match hit {
            Some((citation, pattern)) => {
                tracing::debug!(
                    rule = %rule_id,
                    citation = %citation,
                    pattern = pattern.as_str(),
                    "Rule excluded"
                );
                excluded.push(ExcludedRule {
                    citation: citation.clone(),
                    pattern: pattern.as_str().to_string(),
                    line: pattern.line,
                    rule_id,
                });
            }
            None => {
                retained.insert(rule_id, citations);
            }
        }
    }

    (retained, excluded)
}

/// Errors that can occur when loading the exclusion list
#[derive(Debug, Error)]
pub enum ExclusionSourceError {
    /// The file could not be read
    #[error("Failed to read exclusion list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
