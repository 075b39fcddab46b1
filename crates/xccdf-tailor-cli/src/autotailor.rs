//! autotailor invocation
//!
//! Builds the OpenSCAP `autotailor` command line for a plan and runs it
//! synchronously. The tool's exit status is surfaced unchanged.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{CliError, Result};

/// A fully resolved autotailor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutotailorInvocation {
    /// Executable to run
    pub program: String,

    /// Data stream the tailoring applies to
    pub datastream: PathBuf,

    /// Baseline profile short name (e.g. `cis_server_l1`)
    pub base_profile: String,

    /// Tailoring file to write
    pub output: PathBuf,

    /// Id of the new tailored profile
    pub new_profile: String,

    /// Short rule ids to unselect, in order
    pub unselect: Vec<String>,
}

impl AutotailorInvocation {
    /// Arguments in autotailor's expected order
    ///
    /// `-o OUTPUT -p NEW_PROFILE DATASTREAM BASE_PROFILE -u RULE ...`
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            self.output.clone().into(),
            "-p".into(),
            self.new_profile.clone().into(),
            self.datastream.clone().into(),
            self.base_profile.clone().into(),
        ];
        for rule_id in &self.unselect {
            args.push("-u".into());
            args.push(rule_id.into());
        }
        args
    }

    /// Human-readable command line, for dry runs and logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args().iter().map(|a| shell_quote(&a.to_string_lossy())))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tool and wait for it to exit
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            program = %self.program,
            output = %self.output.display(),
            unselect = self.unselect.len(),
            "Running tailoring tool"
        );

        let status = Command::new(&self.program)
            .args(self.args())
            .status()
            .map_err(|e| CliError::ToolSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CliError::ToolFailed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(program: &str, unselect: &[&str]) -> AutotailorInvocation {
        AutotailorInvocation {
            program: program.to_string(),
            datastream: PathBuf::from("content/build/ssg-almalinux9-ds.xml"),
            base_profile: "cis_server_l1".to_string(),
            output: PathBuf::from("custom-tailoring.xml"),
            new_profile: "custom".to_string(),
            unselect: unselect.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_args_order() {
        let inv = invocation("autotailor", &["partition_for_tmp", "sshd_disable_root_login"]);
        let args: Vec<String> = inv
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-o",
                "custom-tailoring.xml",
                "-p",
                "custom",
                "content/build/ssg-almalinux9-ds.xml",
                "cis_server_l1",
                "-u",
                "partition_for_tmp",
                "-u",
                "sshd_disable_root_login",
            ]
        );
    }

    #[test]
    fn test_args_without_unselect() {
        let inv = invocation("autotailor", &[]);
        assert_eq!(inv.args().len(), 6);
    }

    #[test]
    fn test_command_line_quotes_when_needed() {
        let mut inv = invocation("autotailor", &["example"]);
        inv.output = PathBuf::from("my tailoring.xml");
        assert_eq!(
            inv.command_line(),
            "autotailor -o 'my tailoring.xml' -p custom content/build/ssg-almalinux9-ds.xml cis_server_l1 -u example"
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let inv = invocation("/nonexistent/autotailor", &[]);
        let err = inv.run().unwrap_err();
        assert!(matches!(err, CliError::ToolSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_tool() {
        let inv = invocation("true", &["example"]);
        inv.run().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_status_propagated() {
        let inv = invocation("false", &["example"]);
        let err = inv.run().unwrap_err();
        match err {
            CliError::ToolFailed { program, code } => {
                assert_eq!(program, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
