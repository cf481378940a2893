//! colcon command lines.
//!
//! Every invocation the wrappers make is built here from a small decision
//! table, so the argument vectors can be checked without spawning anything.

use std::fmt;
use std::process::{ExitCode, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the orchestrator binary, looked up on `PATH`.
pub const COLCON: &str = "colcon";

/// CMake build type passed through `--cmake-args`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    // ---
    /// `Debug` when `debug` is set, `Release` otherwise.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            BuildType::Debug
        } else {
            BuildType::Release
        }
    }

    /// The `-DCMAKE_BUILD_TYPE=...` define for this build type.
    pub fn cmake_define(self) -> &'static str {
        match self {
            BuildType::Debug => "-DCMAKE_BUILD_TYPE=Debug",
            BuildType::Release => "-DCMAKE_BUILD_TYPE=Release",
        }
    }
}

/// Which packages a build or test run covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PackageScope {
    /// Every package in the workspace.
    #[default]
    All,

    /// The named package and everything it depends on.
    UpTo(String),
}

impl PackageScope {
    // ---
    /// The package name, if the scope is limited to one.
    pub fn package(&self) -> Option<&str> {
        match self {
            PackageScope::All => None,
            PackageScope::UpTo(name) => Some(name.as_str()),
        }
    }

    fn push_args(&self, args: &mut Vec<String>) {
        if let PackageScope::UpTo(name) = self {
            args.push("--packages-up-to".into());
            args.push(name.clone());
        }
    }
}

/// Shows the package name, or `none` for the whole workspace.
impl fmt::Display for PackageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package().unwrap_or("none"))
    }
}

/// A fully decided colcon invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColconCommand {
    // ---
    args: Vec<String>,
}

impl ColconCommand {
    // ---
    /// `colcon build --symlink-install [--packages-up-to P] --cmake-args -DCMAKE_BUILD_TYPE=T`
    pub fn build(scope: &PackageScope, build_type: BuildType) -> Self {
        // ---
        let mut args = vec!["build".to_string(), "--symlink-install".to_string()];
        scope.push_args(&mut args);
        args.push("--cmake-args".into());
        args.push(build_type.cmake_define().into());
        Self { args }
    }

    /// `colcon test [--packages-up-to P]`
    pub fn test(scope: &PackageScope) -> Self {
        // ---
        let mut args = vec!["test".to_string()];
        scope.push_args(&mut args);
        Self { args }
    }

    /// `colcon test-result --all [--verbose]`
    pub fn test_result(verbose: bool) -> Self {
        // ---
        let mut args = vec!["test-result".to_string(), "--all".to_string()];
        if verbose {
            args.push("--verbose".into());
        }
        Self { args }
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A `tokio` command for this invocation, run in the current directory.
    ///
    /// The child is killed if the handle is dropped before it exits.
    pub fn to_command(&self) -> Command {
        // ---
        let mut command = Command::new(COLCON);
        command.args(&self.args).kill_on_drop(true);
        command
    }

    /// Runs colcon with the parent's stdio and waits for it.
    ///
    /// # Errors
    ///
    /// Returns error if colcon cannot be started or waited on. A non-zero
    /// exit is not an error; inspect the returned status.
    pub async fn run_inherited(&self) -> Result<ExitStatus> {
        // ---
        debug!("Running command: {}", self);

        let status = self
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to start {COLCON}"))?;

        if !status.success() {
            warn!("{} exited with {}", self, status);
        }

        Ok(status)
    }
}

impl fmt::Display for ColconCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COLCON} {}", self.args.join(" "))
    }
}

/// Maps a child's exit status onto the wrapper's exit code.
pub fn exit_code(status: ExitStatus) -> ExitCode {
    ExitCode::from(status_code(status))
}

/// Signal terminations have no code and map to 1, as do codes outside `u8`.
fn status_code(status: ExitStatus) -> u8 {
    // ---
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}
