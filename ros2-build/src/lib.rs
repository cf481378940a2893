//! colcon build wrapper.
//!
//! Builds the whole workspace or one package (with everything it depends
//! on) using a symlinked install, in Debug or Release. colcon's output goes
//! straight to the terminal.

use std::process::ExitStatus;

use anyhow::Result;
use tracing::info;

use ros2_helper_common::{BuildType, ColconCommand, PackageScope, ResolvedWorkspace, WorkdirGuard};

/// Everything needed to decide and run one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    // ---
    pub workspace: ResolvedWorkspace,
    pub build_type: BuildType,
}

impl BuildOptions {
    // ---
    pub fn new(workspace: ResolvedWorkspace, debug: bool) -> Self {
        Self {
            workspace,
            build_type: BuildType::from_debug(debug),
        }
    }

    /// The colcon invocation for these options.
    pub fn command(&self) -> ColconCommand {
        ColconCommand::build(&self.workspace.scope, self.build_type)
    }
}

/// Runs the build inside the workspace and returns colcon's exit status.
///
/// The working directory is restored before this returns, whether or not
/// the build succeeded.
///
/// # Errors
///
/// Returns error if the workspace directory cannot be entered or colcon
/// cannot be started.
pub async fn run_build(opts: &BuildOptions) -> Result<ExitStatus> {
    // ---
    let ws = &opts.workspace;
    let _workdir = WorkdirGuard::enter(&ws.path)?;

    info!("Build Options: workspace={}, package={}", ws.name, ws.scope);
    match &ws.scope {
        PackageScope::All => info!("Build entire workspace: {}", ws.name),
        PackageScope::UpTo(package) => info!("Build package: {package}"),
    }

    opts.command().run_inherited().await
}
