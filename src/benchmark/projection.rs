//! Identifier projection for the tailoring tool
//!
//! `autotailor` addresses rules and profiles by their short names, so the
//! ComplianceAsCode namespace prefixes are stripped before hand-off.

use std::collections::BTreeSet;

use super::resolver::CitationMap;

/// Namespace prefix of ComplianceAsCode rule ids
pub const RULE_ID_PREFIX: &str = "xccdf_org.ssgproject.content_rule_";

/// Namespace prefix of ComplianceAsCode profile ids
pub const PROFILE_ID_PREFIX: &str = "xccdf_org.ssgproject.content_profile_";

/// Strip the rule prefix from a rule id, if present
pub fn short_rule_id(rule_id: &str) -> &str {
    rule_id.strip_prefix(RULE_ID_PREFIX).unwrap_or(rule_id)
}

/// Strip the profile prefix from a profile id, if present
pub fn short_profile_id(profile_id: &str) -> &str {
    profile_id.strip_prefix(PROFILE_ID_PREFIX).unwrap_or(profile_id)
}

/// Bare rule ids for every key in the mapping
pub fn project_ids(mapping: &CitationMap) -> BTreeSet<String> {
    mapping
        .keys()
        .map(|id| short_rule_id(id).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ids_strips_prefix() {
        let mut mapping = CitationMap::new();
        mapping.insert("xccdf_org.ssgproject.content_rule_example".into(), vec!["1.1.1.1".into()]);
        mapping.insert("custom_rule".into(), vec![]);

        let ids = project_ids(&mapping);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["custom_rule", "example"]);
    }

    #[test]
    fn test_prefix_only_stripped_at_start() {
        assert_eq!(
            short_rule_id("x_xccdf_org.ssgproject.content_rule_y"),
            "x_xccdf_org.ssgproject.content_rule_y"
        );
    }

    #[test]
    fn test_short_profile_id() {
        assert_eq!(
            short_profile_id("xccdf_org.ssgproject.content_profile_cis_server_l1"),
            "cis_server_l1"
        );
        assert_eq!(short_profile_id("cis_server_l1"), "cis_server_l1");
    }
}
