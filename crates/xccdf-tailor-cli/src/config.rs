//! Configuration parsing for tailor.toml
//!
//! Every section and field is optional. Values missing from the file fall
//! back to the defaults of the AlmaLinux 9 CIS Server Level 1 workflow, and
//! command-line flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use xccdf_tailor::benchmark::{short_profile_id, CIS_BENCHMARK_SOURCE};
use xccdf_tailor::{PlanOptions, DEFAULT_PROFILE_ID};

use crate::error::{CliError, Result};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tailor.toml";

/// Root configuration structure for tailor.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailorConfig {
    /// Benchmark content and baseline profile
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Exclusion pattern source
    #[serde(default)]
    pub exclusions: ExclusionsConfig,

    /// Tailoring output and external tool
    #[serde(default)]
    pub tailoring: TailoringConfig,
}

impl TailorConfig {
    /// Load configuration from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_str(&content, path)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve the configuration to use
    ///
    /// An explicitly requested file must exist. Without one, `tailor.toml`
    /// in the working directory is used when present, defaults otherwise.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::ConfigNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_file(implicit)
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Plan options derived from the benchmark section
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            profile_id: self.benchmark.profile.clone(),
            reference_source: self.benchmark.reference_source.clone(),
        }
    }

    /// Baseline profile name passed to autotailor
    ///
    /// Falls back to the benchmark profile id without its namespace prefix.
    pub fn base_profile(&self) -> String {
        self.tailoring
            .base_profile
            .clone()
            .unwrap_or_else(|| short_profile_id(&self.benchmark.profile).to_string())
    }
}

/// Benchmark content configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// SCAP source data stream or XCCDF benchmark
    #[serde(default = "default_datastream")]
    pub datastream: PathBuf,

    /// Full id of the baseline profile
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Substring identifying CIS references in `href` attributes
    #[serde(default = "default_reference_source")]
    pub reference_source: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            datastream: default_datastream(),
            profile: default_profile(),
            reference_source: default_reference_source(),
        }
    }
}

fn default_datastream() -> PathBuf {
    PathBuf::from("content/build/ssg-almalinux9-ds.xml")
}

fn default_profile() -> String {
    DEFAULT_PROFILE_ID.to_string()
}

fn default_reference_source() -> String {
    CIS_BENCHMARK_SOURCE.to_string()
}

/// Exclusion list configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionsConfig {
    /// Newline-delimited pattern file
    #[serde(default = "default_exclusions_file")]
    pub file: PathBuf,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            file: default_exclusions_file(),
        }
    }
}

fn default_exclusions_file() -> PathBuf {
    PathBuf::from("exclude-chapters.txt")
}

/// Tailoring output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailoringConfig {
    /// Tailoring file written by autotailor
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Id of the new tailored profile
    #[serde(default = "default_new_profile")]
    pub profile: String,

    /// Baseline profile name given to autotailor
    #[serde(default)]
    pub base_profile: Option<String>,

    /// Tailoring tool executable
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for TailoringConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            profile: default_new_profile(),
            base_profile: None,
            command: default_command(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("custom-tailoring.xml")
}

fn default_new_profile() -> String {
    "custom".to_string()
}

fn default_command() -> String {
    "autotailor".to_string()
}

/// Template written by `xccdf-tailor init`
pub fn init_template() -> String {
    let defaults = TailorConfig::default();
    format!(
        r#"# xccdf-tailor configuration
#
# Rules of the baseline profile that cite the CIS benchmark are unselected
# in the generated tailoring, except those whose CIS section matches a
# pattern in the exclusions file.

[benchmark]
datastream = "{}"
profile = "{}"
reference_source = "{}"

[exclusions]
# One shell-style pattern per line, e.g. 1.1.2.*
# Lines starting with '#' are comments
file = "{}"

[tailoring]
output = "{}"
profile = "{}"
# base_profile = "{}"
command = "{}"
"#,
        defaults.benchmark.datastream.display(),
        defaults.benchmark.profile,
        defaults.benchmark.reference_source,
        defaults.exclusions.file.display(),
        defaults.tailoring.output.display(),
        defaults.tailoring.profile,
        defaults.base_profile(),
        defaults.tailoring.command,
    )
}
