//! Reference Resolver
//!
//! Maps selected rule ids to the citation texts of their CIS benchmark
//! references. Only rules with at least one qualifying reference appear in
//! the result; that presence is the signal that a rule is tied to the
//! benchmark.

use std::collections::BTreeMap;

use super::document::BenchmarkDocument;

/// Substring identifying CIS benchmark references in `href` attributes
pub const CIS_BENCHMARK_SOURCE: &str = "cisecurity.org/benchmark/";

/// Rule id -> citation texts, in document order per rule
pub type CitationMap = BTreeMap<String, Vec<String>>;

/// Resolve the citations of each rule whose references come from `source_pattern`
///
/// `source_pattern` is matched as a plain substring of each reference's
/// `href`. Unknown rule ids are skipped, as are rules without a qualifying
/// reference. Qualifying references with empty or missing text still put the
/// rule in the map but contribute no citation. Duplicate ids are harmless.
pub fn resolve_citations<'a, I>(
    document: &BenchmarkDocument,
    rule_ids: I,
    source_pattern: &str,
) -> CitationMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mapping = CitationMap::new();

    for rule_id in rule_ids {
        let Some(rule) = document.find_rule(rule_id) else {
            tracing::debug!(rule = rule_id, "Selected rule not defined in benchmark, skipping");
            continue;
        };

        let mut qualifying = rule.references_from(source_pattern).peekable();
        if qualifying.peek().is_none() {
            continue;
        }

        let citations = qualifying
            .filter_map(|r| r.citation())
            .map(str::to_string)
            .collect();
        mapping.insert(rule_id.to_string(), citations);
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::document::{Reference, Rule, Severity};

    fn rule(id: &str, refs: &[(Option<&str>, Option<&str>)]) -> Rule {
        Rule {
            id: id.to_string(),
            title: None,
            severity: Severity::Unknown,
            references: refs
                .iter()
                .map(|(href, text)| Reference {
                    href: href.map(str::to_string),
                    text: text.map(str::to_string),
                })
                .collect(),
        }
    }

    const CIS: Option<&str> = Some("https://www.cisecurity.org/benchmark/almalinux_linux/");
    const NIST: Option<&str> = Some("http://nvlpubs.nist.gov/nistpubs/SpecialPublications/NIST.SP.800-53r4.pdf");

    fn sample_document() -> BenchmarkDocument {
        BenchmarkDocument::from_parts(
            vec![],
            vec![
                rule("r_cis", &[(CIS, Some("1.1.2.1")), (NIST, Some("CM-6(a)")), (CIS, Some("1.1.2.2"))]),
                rule("r_nist_only", &[(NIST, Some("AC-7"))]),
                rule("r_no_refs", &[]),
                rule("r_cis_empty", &[(CIS, Some("")), (CIS, None)]),
                rule("r_no_href", &[(None, Some("1.2.3"))]),
            ],
        )
    }

    #[test]
    fn test_qualifying_citations_in_document_order() {
        let doc = sample_document();
        let mapping = resolve_citations(&doc, ["r_cis"], CIS_BENCHMARK_SOURCE);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["r_cis"], vec!["1.1.2.1", "1.1.2.2"]);
    }

    #[test]
    fn test_rules_without_qualifying_references_absent() {
        let doc = sample_document();
        let mapping = resolve_citations(
            &doc,
            ["r_nist_only", "r_no_refs", "r_no_href"],
            CIS_BENCHMARK_SOURCE,
        );
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_unknown_rules_skipped() {
        let doc = sample_document();
        let mapping = resolve_citations(&doc, ["missing", "r_cis"], CIS_BENCHMARK_SOURCE);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["r_cis"]);
    }

    #[test]
    fn test_empty_citations_still_recorded() {
        let doc = sample_document();
        let mapping = resolve_citations(&doc, ["r_cis_empty"], CIS_BENCHMARK_SOURCE);
        assert_eq!(mapping.get("r_cis_empty"), Some(&Vec::new()));
    }

    #[test]
    fn test_duplicate_ids_idempotent() {
        let doc = sample_document();
        let once = resolve_citations(&doc, ["r_cis"], CIS_BENCHMARK_SOURCE);
        let twice = resolve_citations(&doc, ["r_cis", "r_cis"], CIS_BENCHMARK_SOURCE);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_source_pattern_is_substring_not_glob() {
        let doc = sample_document();
        assert!(resolve_citations(&doc, ["r_cis"], "cisecurity.org/*").is_empty());
        assert!(!resolve_citations(&doc, ["r_nist_only"], "nist.gov").is_empty());
    }
}
