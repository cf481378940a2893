//! colcon build wrapper - CLI binary.
//!
//! Resolves `$ROS2_ROOT_WS/<workspace>` and runs `colcon build` there for
//! the whole workspace or one package.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use ros2_build::{run_build, BuildOptions};
use ros2_helper_common::{exit_code, init_tracing, ColorArg, ResolvedWorkspace, WorkspaceArgs};

/// Build a ROS 2 workspace or package with colcon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    // ---
    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Build with CMAKE_BUILD_TYPE=Debug instead of Release
    #[arg(short, long)]
    debug: bool,

    /// Coloring
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorArg,
}

/// Capture version number from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ---
    let args = Args::parse();
    init_tracing(args.color.into())?;
    debug!("ros2_build v{VERSION}");

    let workspace = ResolvedWorkspace::from_process(&args.workspace)?;
    let opts = BuildOptions::new(workspace, args.debug);

    let status = run_build(&opts).await?;
    Ok(exit_code(status))
}
