//! colcon test wrapper.
//!
//! Runs `colcon test` for the workspace or one package and colorizes its
//! output as it streams, or shows the results of a previous run.

use std::process::ExitStatus;

use anyhow::Result;
use tracing::info;

use ros2_helper_common::{
    run_streaming, ColconCommand, ColorWhen, Colorizer, LineSink, PackageScope, ResolvedWorkspace,
    WorkdirGuard,
};

/// What a `ros2_test` invocation does. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestAction {
    /// `colcon test-result --all --verbose`, with failures highlighted.
    ShowResultVerbose,

    /// `colcon test-result --all`, printed as-is.
    ShowResult,

    /// `colcon test` over the given scope.
    Run(PackageScope),
}

impl TestAction {
    // ---
    /// Picks the action from the flags: verbose results, then results, then a test run.
    pub fn select(show_result_verbose: bool, show_result: bool, scope: PackageScope) -> Self {
        // ---
        if show_result_verbose {
            TestAction::ShowResultVerbose
        } else if show_result {
            TestAction::ShowResult
        } else {
            TestAction::Run(scope)
        }
    }

    /// The colcon invocation for this action.
    pub fn command(&self) -> ColconCommand {
        match self {
            TestAction::ShowResultVerbose => ColconCommand::test_result(true),
            TestAction::ShowResult => ColconCommand::test_result(false),
            TestAction::Run(scope) => ColconCommand::test(scope),
        }
    }
}

/// Everything needed to decide and run one `ros2_test` invocation.
#[derive(Debug, Clone)]
pub struct TestOptions {
    // ---
    pub workspace: ResolvedWorkspace,
    pub action: TestAction,

    /// Color policy for streamed output.
    pub color: ColorWhen,
}

impl TestOptions {
    // ---
    pub fn new(
        workspace: ResolvedWorkspace,
        show_result_verbose: bool,
        show_result: bool,
        color: ColorWhen,
    ) -> Self {
        // ---
        let action = TestAction::select(show_result_verbose, show_result, workspace.scope.clone());
        Self {
            workspace,
            action,
            color,
        }
    }
}

/// Performs the selected action inside the workspace.
///
/// Every branch, including the result displays, restores the working
/// directory before returning.
///
/// # Errors
///
/// Returns error if the workspace directory cannot be entered, colcon cannot
/// be started, or its output cannot be written.
pub async fn run_tests(opts: &TestOptions) -> Result<ExitStatus> {
    // ---
    let ws = &opts.workspace;
    let _workdir = WorkdirGuard::enter(&ws.path)?;
    let command = opts.action.command();

    match &opts.action {
        TestAction::ShowResultVerbose => {
            info!("Show test results (verbose)");
            let mut sink = LineSink::terminal(Colorizer::test_result(), opts.color);
            run_streaming(command.to_command(), &mut sink).await
        }
        TestAction::ShowResult => {
            info!("Show test results");
            command.run_inherited().await
        }
        TestAction::Run(scope) => {
            info!("Test Options: workspace={}, package={}", ws.name, scope);
            match scope {
                PackageScope::All => info!("Test entire workspace: {}", ws.name),
                PackageScope::UpTo(package) => info!("Test package: {package}"),
            }
            let mut sink = LineSink::terminal(Colorizer::test_run(), opts.color);
            run_streaming(command.to_command(), &mut sink).await
        }
    }
}
