//! CLI-related shared utilities.
//!
//! This module centralizes CLI policy so binaries don't duplicate behavior.

mod args;
mod color;

pub use args::{ColorArg, WorkspaceArgs};
pub use color::ColorWhen;
