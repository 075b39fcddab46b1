//! Output formatting and display utilities
//!
//! Status lines go to stderr so that stdout carries only plan output.

use colored::Colorize;

use xccdf_tailor::benchmark::{short_rule_id, Profile};
use xccdf_tailor::TailoringPlan;

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    eprintln!("\n{}", msg.bold().underline());
}

/// Print a subheader
pub fn subheader(msg: &str) {
    eprintln!("\n{}", msg.bold());
}

/// Print a summary of the plan, with per-rule detail when `explain` is set
pub fn print_plan_summary(plan: &TailoringPlan, explain: bool) {
    header(&format!("Plan: {}", plan.profile_id));

    if !plan.profile_found {
        warning("Profile not found in benchmark; nothing is selected");
    }

    eprintln!("  Selected rules:     {}", plan.selected);
    eprintln!("  CIS-cited rules:    {}", plan.cited());
    eprintln!("  Excluded by list:   {}", plan.excluded.len());
    eprintln!("  To unselect:        {}", plan.unselect.len());

    if explain && !plan.excluded.is_empty() {
        subheader("Excluded:");
        for rule in &plan.excluded {
            eprintln!(
                "  {} {} {} {}",
                "−".yellow(),
                short_rule_id(&rule.rule_id),
                format!("[{}]", rule.citation).dimmed(),
                format!("matched '{}' (line {})", rule.pattern, rule.line).dimmed(),
            );
        }
    }

    if explain && !plan.retained.is_empty() {
        subheader("Unselected:");
        for (rule_id, citations) in &plan.retained {
            let cites = if citations.is_empty() {
                "no citation text".to_string()
            } else {
                citations.join(", ")
            };
            eprintln!(
                "  {} {} {}",
                "→".cyan(),
                short_rule_id(rule_id),
                format!("[{}]", cites).dimmed()
            );
        }
    }

    eprintln!();
}

/// Print unselect ids to stdout, one per line
pub fn print_unselect(plan: &TailoringPlan) {
    for rule_id in &plan.unselect {
        println!("{}", rule_id);
    }
}

/// Print a table of profiles
pub fn print_profiles(profiles: &[Profile]) {
    header(&format!("{} profile(s)", profiles.len()));
    for profile in profiles {
        println!(
            "{} {}",
            profile.id,
            format!("({} selections)", profile.selections.len()).dimmed()
        );
        if let Some(title) = &profile.title {
            println!("    {}", title.dimmed());
        }
    }
}

/// Print a JSON report
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Progress spinner for loading large data streams
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        let style = indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish_success(self, msg: &str) {
        self.pb.finish_and_clear();
        success(msg);
    }

    pub fn finish_error(self, msg: &str) {
        self.pb.finish_and_clear();
        error(msg);
    }
}
