//! XCCDF Benchmark Document Index
//!
//! Loads an XCCDF benchmark (bare or wrapped in a SCAP source data stream)
//! into an owned, read-only model and answers profile and rule lookups.
//!
//! Lookups are permissive: an unknown profile yields no selections and an
//! unknown rule yields `None`. Neither is an error, and callers narrow their
//! result sets accordingly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use serde::Serialize;
use thiserror::Error;

/// XCCDF 1.2 namespace used by ComplianceAsCode data streams
pub const XCCDF_1_2_NS: &str = "http://checklists.nist.gov/xccdf/1.2";

/// XCCDF 1.1 namespace, still found in older benchmark exports
pub const XCCDF_1_1_NS: &str = "http://checklists.nist.gov/xccdf/1.1";

/// Origin label for documents parsed from memory
const MEMORY_ORIGIN: &str = "<memory>";

/// A loaded benchmark catalog
///
/// Owns every profile and rule found in the document. Immutable once built;
/// pass it by reference to the resolver and planner.
#[derive(Debug, Clone)]
pub struct BenchmarkDocument {
    /// Where the document was loaded from, if it came from disk
    source: Option<PathBuf>,

    /// Profiles in document order
    profiles: Vec<Profile>,

    /// Rules in document order
    rules: Vec<Rule>,

    /// Profile id -> index of its first occurrence
    profile_index: HashMap<String, usize>,

    /// Rule id -> index of its first occurrence
    rule_index: HashMap<String, usize>,
}

/// A named selection of rules forming one baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Profile identifier (e.g. `xccdf_org.ssgproject.content_profile_cis_server_l1`)
    pub id: String,

    /// Human-readable title
    pub title: Option<String>,

    /// `select` directives in document order, duplicates preserved
    pub selections: Vec<Selection>,
}

/// A single `select` directive inside a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Referenced rule or group id
    pub idref: String,

    /// Value of the `selected` attribute (defaults to true)
    pub selected: bool,
}

/// A single compliance check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Rule identifier (e.g. `xccdf_org.ssgproject.content_rule_partition_for_tmp`)
    pub id: String,

    /// Human-readable title
    pub title: Option<String>,

    /// Declared severity
    pub severity: Severity,

    /// External-standard citations in document order
    pub references: Vec<Reference>,
}

/// A citation linking a rule to an external standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Source tag identifying the citing standard
    pub href: Option<String>,

    /// Citation content (e.g. "1.1.2.1"), verbatim
    pub text: Option<String>,
}

impl Reference {
    /// Whether the source tag contains `pattern` as a plain substring
    pub fn is_from(&self, pattern: &str) -> bool {
        self.href
            .as_deref()
            .map(|href| href.contains(pattern))
            .unwrap_or(false)
    }

    /// Citation text, if present and non-empty
    pub fn citation(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Rule severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Missing or unrecognised severity
    #[default]
    Unknown,
}

impl Severity {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("low") => Self::Low,
            Some("medium") => Self::Medium,
            Some("high") => Self::High,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Counts describing a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Number of profiles
    pub profiles: usize,
    /// Number of rules
    pub rules: usize,
    /// Number of references across all rules
    pub references: usize,
}

impl std::fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Benchmark Statistics")?;
        writeln!(f, "====================")?;
        writeln!(f, "Profiles:    {}", self.profiles)?;
        writeln!(f, "Rules:       {}", self.rules)?;
        writeln!(f, "References:  {}", self.references)?;
        Ok(())
    }
}

impl BenchmarkDocument {
    /// Load a benchmark or data stream from a file path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DocumentLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut document = Self::parse(&content, &path.display().to_string())?;
        document.source = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            profiles = document.profiles.len(),
            rules = document.rules.len(),
            "Loaded benchmark document"
        );

        Ok(document)
    }

    /// Parse a benchmark or data stream from XML text
    pub fn from_xml(xml: &str) -> Result<Self, DocumentLoadError> {
        Self::parse(xml, MEMORY_ORIGIN)
    }

    fn parse(xml: &str, origin: &str) -> Result<Self, DocumentLoadError> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;

        let tree = roxmltree::Document::parse_with_options(xml, options).map_err(|e| {
            DocumentLoadError::Malformed {
                origin: origin.to_string(),
                source: e,
            }
        })?;

        let mut profiles = Vec::new();
        let mut rules = Vec::new();

        for node in tree.descendants() {
            if is_xccdf(&node, "Profile") {
                if let Some(profile) = Profile::from_node(&node) {
                    profiles.push(profile);
                }
            } else if is_xccdf(&node, "Rule") {
                if let Some(rule) = Rule::from_node(&node) {
                    rules.push(rule);
                }
            }
        }

        Ok(Self::from_parts(profiles, rules))
    }

    /// Build a document directly from profiles and rules
    pub fn from_parts(profiles: Vec<Profile>, rules: Vec<Rule>) -> Self {
        let mut profile_index = HashMap::new();
        for (i, profile) in profiles.iter().enumerate() {
            profile_index.entry(profile.id.clone()).or_insert(i);
        }

        let mut rule_index = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            rule_index.entry(rule.id.clone()).or_insert(i);
        }

        Self {
            source: None,
            profiles,
            rules,
            profile_index,
            rule_index,
        }
    }

    /// Path the document was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// All profiles in document order
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// All rules in document order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Find a profile by exact id; the first document-order match wins
    pub fn find_profile(&self, profile_id: &str) -> Option<&Profile> {
        self.profile_index
            .get(profile_id)
            .map(|&i| &self.profiles[i])
    }

    /// Rule ids selected by a profile, in document order
    ///
    /// Returns an empty list when the profile does not exist.
    pub fn selected_rule_ids(&self, profile_id: &str) -> Vec<&str> {
        match self.find_profile(profile_id) {
            Some(profile) => profile.selected_ids().collect(),
            None => {
                tracing::debug!(profile = profile_id, "Profile not found in benchmark");
                Vec::new()
            }
        }
    }

    /// Find a rule by exact id; the first document-order match wins
    pub fn find_rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rule_index.get(rule_id).map(|&i| &self.rules[i])
    }

    /// Get statistics about the loaded content
    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            profiles: self.profiles.len(),
            rules: self.rules.len(),
            references: self.rules.iter().map(|r| r.references.len()).sum(),
        }
    }
}

impl Profile {
    fn from_node(node: &Node<'_, '_>) -> Option<Self> {
        let id = node.attribute("id")?.to_string();

        let selections = node
            .descendants()
            .filter(|n| is_xccdf(n, "select"))
            .filter_map(|n| {
                let idref = n.attribute("idref").filter(|s| !s.is_empty())?;
                Some(Selection {
                    idref: idref.to_string(),
                    selected: n.attribute("selected").map(parse_bool).unwrap_or(true),
                })
            })
            .collect();

        Some(Self {
            id,
            title: child_text(node, "title"),
            selections,
        })
    }

    /// Every selected idref, regardless of the `selected` flag
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selections.iter().map(|s| s.idref.as_str())
    }
}

impl Rule {
    fn from_node(node: &Node<'_, '_>) -> Option<Self> {
        let id = node.attribute("id")?.to_string();

        let references = node
            .descendants()
            .filter(|n| is_xccdf(n, "reference"))
            .map(|n| Reference {
                href: n.attribute("href").map(str::to_string),
                text: n.text().map(str::to_string),
            })
            .collect();

        Some(Self {
            id,
            title: child_text(node, "title"),
            severity: Severity::parse(node.attribute("severity")),
            references,
        })
    }

    /// References whose source tag contains `pattern`
    pub fn references_from<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| r.is_from(pattern))
    }
}

fn is_xccdf(node: &Node<'_, '_>, local_name: &str) -> bool {
    if !node.is_element() {
        return false;
    }
    let tag = node.tag_name();
    tag.name() == local_name
        && matches!(tag.namespace(), Some(XCCDF_1_2_NS) | Some(XCCDF_1_1_NS))
}

fn child_text(node: &Node<'_, '_>, local_name: &str) -> Option<String> {
    node.children()
        .find(|n| is_xccdf(n, local_name))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_bool(value: &str) -> bool {
    !matches!(value.trim(), "false" | "0")
}

/// Errors that can occur when loading a benchmark document
#[derive(Debug, Error)]
pub enum DocumentLoadError {
    /// The file could not be read
    #[error("Failed to read benchmark document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not well-formed XML
    #[error("Benchmark document {origin} is not well-formed XML: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: roxmltree::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_benchmark() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ds:data-stream-collection xmlns:ds="http://scap.nist.gov/schema/scap/source/1.2">
  <ds:component id="scap_org.open-scap_comp_ssg-almalinux9-xccdf.xml">
    <Benchmark xmlns="http://checklists.nist.gov/xccdf/1.2" id="xccdf_org.ssgproject.content_benchmark_ALMALINUX-9">
      <Profile id="xccdf_org.ssgproject.content_profile_cis_server_l1">
        <title>CIS AlmaLinux OS 9 Benchmark for Level 1 - Server</title>
        <select idref="xccdf_org.ssgproject.content_rule_partition_for_tmp" selected="true"/>
        <select idref="xccdf_org.ssgproject.content_rule_missing" selected="true"/>
        <select idref="xccdf_org.ssgproject.content_rule_partition_for_tmp" selected="true"/>
        <select idref="xccdf_org.ssgproject.content_rule_mount_option_tmp_nodev" selected="false"/>
        <select selected="true"/>
      </Profile>
      <Profile id="xccdf_org.ssgproject.content_profile_stig">
        <select idref="xccdf_org.ssgproject.content_rule_mount_option_tmp_nodev" selected="true"/>
      </Profile>
      <Group id="xccdf_org.ssgproject.content_group_system">
        <Group id="xccdf_org.ssgproject.content_group_partitions">
          <Rule id="xccdf_org.ssgproject.content_rule_partition_for_tmp" severity="low">
            <title>Ensure /tmp Located On Separate Partition</title>
            <reference href="https://www.cisecurity.org/benchmark/almalinux_linux/">1.1.2.1</reference>
            <reference href="http://nvlpubs.nist.gov/nistpubs/SpecialPublications/NIST.SP.800-53r4.pdf">CM-6(a)</reference>
          </Rule>
        </Group>
        <Rule id="xccdf_org.ssgproject.content_rule_mount_option_tmp_nodev" severity="medium">
          <title>Add nodev Option to /tmp</title>
        </Rule>
      </Group>
    </Benchmark>
  </ds:component>
</ds:data-stream-collection>
"#
    }

    #[test]
    fn test_load_from_data_stream() {
        let doc = BenchmarkDocument::from_xml(sample_benchmark()).unwrap();
        assert_eq!(doc.profiles().len(), 2);
        assert_eq!(doc.rules().len(), 2);
        assert!(doc.source().is_none());
    }

    #[test]
    fn test_selected_rule_ids_in_document_order() {
        let doc = BenchmarkDocument::from_xml(sample_benchmark()).unwrap();
        let ids = doc.selected_rule_ids("xccdf_org.ssgproject.content_profile_cis_server_l1");
        assert_eq!(
            ids,
            vec![
                "xccdf_org.ssgproject.content_rule_partition_for_tmp",
                "xccdf_org.ssgproject.content_rule_missing",
                "xccdf_org.ssgproject.content_rule_partition_for_tmp",
                "xccdf_org.ssgproject.content_rule_mount_option_tmp_nodev",
            ]
        );
    }

    #[test]
    fn test_selected_rule_ids_unknown_profile_is_empty() {
        let doc = BenchmarkDocument::from_xml(sample_benchmark()).unwrap();
        assert!(doc.selected_rule_ids("xccdf_org.ssgproject.content_profile_nope").is_empty());
        assert!(doc.selected_rule_ids("").is_empty());
    }

    #[test]
    fn test_selection_flags() {
        let doc = BenchmarkDocument::from_xml(sample_benchmark()).unwrap();
        let profile = doc
            .find_profile("xccdf_org.ssgproject.content_profile_cis_server_l1")
            .unwrap();
        assert_eq!(
            profile.title.as_deref(),
            Some("CIS AlmaLinux OS 9 Benchmark for Level 1 - Server")
        );
        assert!(profile.selections[0].selected);
        assert!(!profile.selections[3].selected);
    }

    #[test]
    fn test_find_rule() {
        let doc = BenchmarkDocument::from_xml(sample_benchmark()).unwrap();

        let rule = doc
            .find_rule("xccdf_org.ssgproject.content_rule_partition_for_tmp")
            .unwrap();
        assert_eq!(rule.severity, Severity::Low);
        assert_eq!(rule.references.len(), 2);
        assert_eq!(rule.references[0].citation(), Some("1.1.2.1"));
        assert_eq!(rule.references_from("cisecurity.org/benchmark/").count(), 1);

        assert!(doc.find_rule("xccdf_org.ssgproject.content_rule_missing").is_none());
    }

    #[test]
    fn test_duplicate_rule_first_wins() {
        let xml = r#"<Benchmark xmlns="http://checklists.nist.gov/xccdf/1.2">
  <Rule id="r1"><reference href="a">first</reference></Rule>
  <Rule id="r1"><reference href="a">second</reference></Rule>
</Benchmark>"#;
        let doc = BenchmarkDocument::from_xml(xml).unwrap();
        let rule = doc.find_rule("r1").unwrap();
        assert_eq!(rule.references[0].text.as_deref(), Some("first"));
    }

    #[test]
    fn test_foreign_namespace_ignored() {
        let xml = r#"<root xmlns:x="urn:other">
  <x:Rule id="foreign"/>
  <Rule id="no-namespace"/>
  <Rule xmlns="http://checklists.nist.gov/xccdf/1.1" id="legacy"/>
</root>"#;
        let doc = BenchmarkDocument::from_xml(xml).unwrap();
        assert!(doc.find_rule("foreign").is_none());
        assert!(doc.find_rule("no-namespace").is_none());
        assert!(doc.find_rule("legacy").is_some());
    }

    #[test]
    fn test_malformed_xml() {
        let err = BenchmarkDocument::from_xml("<Benchmark><Rule></Benchmark>").unwrap_err();
        assert!(matches!(err, DocumentLoadError::Malformed { .. }));
        assert!(err.to_string().contains("<memory>"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BenchmarkDocument::load("/nonexistent/ssg-ds.xml").unwrap_err();
        assert!(matches!(err, DocumentLoadError::Read { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssg-ds.xml");
        std::fs::write(&path, sample_benchmark()).unwrap();

        let doc = BenchmarkDocument::load(&path).unwrap();
        assert_eq!(doc.source(), Some(path.as_path()));
        assert_eq!(
            doc.stats(),
            DocumentStats {
                profiles: 2,
                rules: 2,
                references: 2,
            }
        );
    }
}
