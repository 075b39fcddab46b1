//! # xccdf-tailor
//!
//! Derives a CIS tailoring from ComplianceAsCode SCAP content by deciding
//! which rules of a baseline profile to unselect.
//!
//! ## Pipeline
//!
//! 1. Load the data stream into a [`benchmark::BenchmarkDocument`]
//! 2. List the rules selected by the baseline profile
//! 3. Keep the rules that cite the CIS benchmark, with their citation texts
//! 4. Drop every rule whose citation matches an exclusion pattern
//! 5. Strip the rule namespace prefix, producing ids for `autotailor -u`
//!
//! ## Quick Start
//!
//! ```ignore
//! use xccdf_tailor::{PlanOptions, TailoringPlan};
//!
//! let plan = TailoringPlan::from_files(
//!     "content/build/ssg-almalinux9-ds.xml",
//!     "exclude-chapters.txt",
//!     &PlanOptions::default(),
//! )?;
//!
//! for rule_id in &plan.unselect {
//!     println!("{rule_id}");
//! }
//! ```

pub mod benchmark;
mod error;
pub mod observability;
mod plan;

pub use error::{Error, Result};
pub use plan::{PlanOptions, TailoringPlan, DEFAULT_PROFILE_ID};
