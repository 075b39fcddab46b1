//! XCCDF Benchmark Content
//!
//! Reads ComplianceAsCode SCAP data streams and decides which rules of a
//! baseline profile should be unselected in a tailoring.
//!
//! # Overview
//!
//! The selection logic is a linear chain of pure transformations over a
//! document that is loaded once and never mutated:
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ BenchmarkDocument│──►│ resolve_citations│──►│ apply_exclusions │──►│ project_ids  │
//! │ selected_rule_ids│   │ (CIS references) │   │ (glob patterns)  │   │ (short ids)  │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘   └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use xccdf_tailor::benchmark::{
//!     apply_exclusions, project_ids, resolve_citations, BenchmarkDocument, ExclusionList,
//!     CIS_BENCHMARK_SOURCE,
//! };
//!
//! let document = BenchmarkDocument::load("content/build/ssg-almalinux9-ds.xml")?;
//! let selected = document.selected_rule_ids("xccdf_org.ssgproject.content_profile_cis_server_l1");
//! let cited = resolve_citations(&document, selected, CIS_BENCHMARK_SOURCE);
//!
//! let exclusions = ExclusionList::from_file("exclude-chapters.txt")?;
//! let unselect = project_ids(&apply_exclusions(cited, &exclusions));
//! ```
//!
//! Lookup misses (unknown profile, unknown rule, rule without a CIS
//! reference) are never errors. They simply narrow the result.

mod document;
mod exclusions;
mod glob;
mod projection;
mod resolver;

pub use document::{
    BenchmarkDocument, DocumentLoadError, DocumentStats, Profile, Reference, Rule, Selection,
    Severity, XCCDF_1_1_NS, XCCDF_1_2_NS,
};
pub use exclusions::{
    apply_exclusions, partition_exclusions, ExcludedRule, ExclusionList, ExclusionPattern,
    ExclusionSourceError,
};
pub use glob::Glob;
pub use projection::{
    project_ids, short_profile_id, short_rule_id, PROFILE_ID_PREFIX, RULE_ID_PREFIX,
};
pub use resolver::{resolve_citations, CitationMap, CIS_BENCHMARK_SOURCE};

#[cfg(test)]
mod tests {
    use super::*;

    fn example_document(citation: &str) -> BenchmarkDocument {
        let xml = format!(
            r#"<Benchmark xmlns="http://checklists.nist.gov/xccdf/1.2" id="xccdf_org.ssgproject.content_benchmark_TEST">
  <Profile id="xccdf_org.ssgproject.content_profile_cis_server_l1">
    <select idref="xccdf_org.ssgproject.content_rule_example" selected="true"/>
  </Profile>
  <Rule id="xccdf_org.ssgproject.content_rule_example" severity="medium">
    <reference href="https://cisecurity.org/benchmark/x">{citation}</reference>
  </Rule>
</Benchmark>"#
        );
        BenchmarkDocument::from_xml(&xml).unwrap()
    }

    fn unselect_ids(document: &BenchmarkDocument, exclusions: &str) -> Vec<String> {
        let selected =
            document.selected_rule_ids("xccdf_org.ssgproject.content_profile_cis_server_l1");
        let cited = resolve_citations(document, selected, CIS_BENCHMARK_SOURCE);
        let retained = apply_exclusions(cited, &ExclusionList::parse(exclusions));
        project_ids(&retained).into_iter().collect()
    }

    #[test]
    fn test_matching_pattern_excludes_rule() {
        let doc = example_document("1.1.1.1");
        assert!(unselect_ids(&doc, "1.1.1.*\n").is_empty());
    }

    #[test]
    fn test_non_matching_pattern_keeps_rule() {
        let doc = example_document("1.1.1.1");
        assert_eq!(unselect_ids(&doc, "2.*\n"), vec!["example"]);
    }

    #[test]
    fn test_comments_and_blanks_are_not_patterns() {
        let doc = example_document("1.1.1.1");
        assert_eq!(unselect_ids(&doc, "# comment\n\n"), vec!["example"]);
    }
}
