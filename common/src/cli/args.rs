//! Flags shared by both wrappers.

use clap::Args;

use super::ColorWhen;

/// `--color` values as they appear on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum ColorArg {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorWhen {
    fn from(v: ColorArg) -> Self {
        match v {
            ColorArg::Auto => ColorWhen::Auto,
            ColorArg::Always => ColorWhen::Always,
            ColorArg::Never => ColorWhen::Never,
        }
    }
}

/// Workspace and package selection, flattened into each binary's `Args`.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArgs {
    // ---
    /// Workspace name under `$ROS2_ROOT_WS` (default: ros2_ws)
    #[arg(short, long, value_name = "NAME")]
    pub workspace: Option<String>,

    /// Package name (whole workspace when neither this nor --this is set)
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// Use the current directory's name as the package (overrides --package)
    #[arg(short = 't', long)]
    pub this: bool,
}
