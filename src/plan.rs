//! Tailoring plan
//!
//! Composes the benchmark pipeline into a single result: which rules of a
//! baseline profile should be unselected, and why each CIS-cited rule was
//! kept or dropped along the way.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::benchmark::{
    partition_exclusions, project_ids, resolve_citations, BenchmarkDocument, CitationMap,
    ExcludedRule, ExclusionList, CIS_BENCHMARK_SOURCE,
};
use crate::error::Result;

/// Default baseline profile
pub const DEFAULT_PROFILE_ID: &str = "xccdf_org.ssgproject.content_profile_cis_server_l1";

/// Inputs that select what the plan is computed over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Full id of the baseline profile
    pub profile_id: String,

    /// Substring identifying qualifying reference sources
    pub reference_source: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            profile_id: DEFAULT_PROFILE_ID.to_string(),
            reference_source: CIS_BENCHMARK_SOURCE.to_string(),
        }
    }
}

impl PlanOptions {
    /// Options for a specific profile, keeping the default reference source
    pub fn for_profile(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Self::default()
        }
    }
}

/// Result of running the selection pipeline
#[derive(Debug, Clone, Serialize)]
pub struct TailoringPlan {
    /// Baseline profile the plan was computed for
    pub profile_id: String,

    /// Number of `select` directives in the profile
    pub selected: usize,

    /// Whether the profile exists in the document
    pub profile_found: bool,

    /// CIS-cited rules that survived exclusion
    pub retained: CitationMap,

    /// Rules removed by an exclusion pattern
    pub excluded: Vec<ExcludedRule>,

    /// Short rule ids to unselect from the baseline
    pub unselect: BTreeSet<String>,
}

impl TailoringPlan {
    /// Run the pipeline over a loaded document
    pub fn build(
        document: &BenchmarkDocument,
        options: &PlanOptions,
        exclusions: &ExclusionList,
    ) -> Self {
        let profile_found = document.find_profile(&options.profile_id).is_some();
        let selected = document.selected_rule_ids(&options.profile_id);
        let selected_count = selected.len();

        let cited = resolve_citations(document, selected, &options.reference_source);
        let cited_count = cited.len();

        let (retained, excluded) = partition_exclusions(cited, exclusions);
        let unselect = project_ids(&retained);

        tracing::info!(
            profile = %options.profile_id,
            selected = selected_count,
            cited = cited_count,
            excluded = excluded.len(),
            unselect = unselect.len(),
            "Computed tailoring plan"
        );

        Self {
            profile_id: options.profile_id.clone(),
            selected: selected_count,
            profile_found,
            retained,
            excluded,
            unselect,
        }
    }

    /// Load the document and exclusion list from disk, then build the plan
    ///
    /// Both inputs are loaded before any selection happens, so a failure
    /// leaves nothing half-computed.
    pub fn from_files(
        datastream: impl AsRef<Path>,
        exclusions: impl AsRef<Path>,
        options: &PlanOptions,
    ) -> Result<Self> {
        let document = BenchmarkDocument::load(datastream)?;
        let exclusions = ExclusionList::from_file(exclusions)?;
        Ok(Self::build(&document, options, &exclusions))
    }

    /// Number of CIS-cited rules before exclusion
    pub fn cited(&self) -> usize {
        self.retained.len() + self.excluded.len()
    }

    /// Whether the plan unselects nothing
    pub fn is_empty(&self) -> bool {
        self.unselect.is_empty()
    }
}
