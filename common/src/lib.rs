//! Shared plumbing for the `ros2_build` and `ros2_test` wrappers.
//!
//! Both binaries resolve a colcon workspace the same way, build colcon
//! command lines from the same table and stream the child's output through
//! the same colorizer. Everything they have in common lives here.

pub mod cli;
pub mod colcon;
pub mod colorize;
pub mod observability;
pub mod stream;
pub mod workspace;

pub use cli::{ColorArg, ColorWhen, WorkspaceArgs};
pub use colcon::{exit_code, BuildType, ColconCommand, PackageScope};
pub use colorize::{Colorizer, Rule, Tone};
pub use observability::init_tracing;
pub use stream::{run_streaming, LineSink, StreamKind};
pub use workspace::{ResolvedWorkspace, WorkdirGuard, WorkspaceEnv};
