//! A throwaway workspace with a fake `colcon` first on `PATH`.
//!
//! The fake prints its working directory and arguments, then runs whatever
//! extra shell the test supplies.

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct FakeColcon {
    // ---
    _dir: TempDir,
    root: PathBuf,
    bin: PathBuf,
}

impl FakeColcon {
    // ---
    /// Creates `<root>/<workspace>` and a `colcon` script running `body`.
    pub fn new(workspace: &str, body: &str) -> Self {
        // ---
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonicalize");
        let bin = root.join("bin");

        fs::create_dir_all(root.join(workspace)).expect("create workspace");
        fs::create_dir_all(&bin).expect("create bin dir");

        let script = bin.join("colcon");
        fs::write(
            &script,
            format!("#!/bin/sh\necho \"cwd=$(pwd -P)\"\necho \"args=$*\"\n{body}\n"),
        )
        .expect("write fake colcon");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");

        Self {
            _dir: dir,
            root,
            bin,
        }
    }

    /// Directory that plays the role of `$ROS2_ROOT_WS`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `PATH` with the fake colcon in front.
    pub fn path_env(&self) -> OsString {
        // ---
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = std::iter::once(self.bin.clone()).chain(std::env::split_paths(&inherited));
        std::env::join_paths(dirs).expect("join PATH")
    }

    /// A command for `bin_name` wired to this fake.
    pub fn command(&self, bin_name: &str) -> assert_cmd::Command {
        // ---
        let mut cmd = assert_cmd::Command::cargo_bin(bin_name).expect("binary not built");
        cmd.env("ROS2_ROOT_WS", &self.root)
            .env("PATH", self.path_env())
            .env("RUST_LOG", "info")
            .env_remove("NO_COLOR")
            .current_dir(&self.root);
        cmd
    }
}
