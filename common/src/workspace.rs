//! Workspace resolution and working-directory handling.
//!
//! A workspace lives at `<ROS2_ROOT_WS or HOME>/<name>`. Resolution reads the
//! environment through a [`WorkspaceEnv`] snapshot so the rules can be
//! exercised without touching the real process environment.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::cli::WorkspaceArgs;
use crate::colcon::PackageScope;

/// Workspace name used when `--workspace` is not given.
pub const DEFAULT_WORKSPACE: &str = "ros2_ws";

/// Environment variable naming the directory that holds workspaces.
pub const ROOT_ENV: &str = "ROS2_ROOT_WS";

/// The environment variables workspace resolution depends on.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceEnv {
    // ---
    /// Value of `ROS2_ROOT_WS`.
    pub root: Option<OsString>,

    /// Value of `HOME`.
    pub home: Option<OsString>,
}

impl WorkspaceEnv {
    // ---
    /// Captures the relevant variables from the running process.
    pub fn from_process() -> Self {
        // ---
        Self {
            root: env::var_os(ROOT_ENV),
            home: env::var_os("HOME"),
        }
    }

    /// Directory that contains the workspaces.
    ///
    /// Empty values count as unset, so `ROS2_ROOT_WS=` falls back to `HOME`.
    ///
    /// # Errors
    ///
    /// Returns error if neither variable holds a value.
    pub fn root_dir(&self) -> Result<PathBuf> {
        // ---
        let non_empty = |v: &Option<OsString>| v.clone().filter(|s| !s.is_empty());

        match non_empty(&self.root).or_else(|| non_empty(&self.home)) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => bail!("neither {ROOT_ENV} nor HOME is set; cannot locate the workspace"),
        }
    }
}

/// A workspace and package selection, fully resolved from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWorkspace {
    // ---
    /// Workspace name as shown to the user.
    pub name: String,

    /// Absolute (or root-relative) path of the workspace.
    pub path: PathBuf,

    /// Which packages colcon should act on.
    pub scope: PackageScope,
}

impl ResolvedWorkspace {
    // ---
    /// Resolves flags against the environment and the current directory.
    ///
    /// The path is not checked for existence; a missing workspace is reported
    /// when the dispatcher tries to enter it.
    ///
    /// # Errors
    ///
    /// Returns error if no root directory can be determined, or if `--this`
    /// is used in a directory without a base name.
    pub fn resolve(args: &WorkspaceArgs, env: &WorkspaceEnv, cwd: &Path) -> Result<Self> {
        // ---
        let name = args
            .workspace
            .clone()
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| DEFAULT_WORKSPACE.to_string());

        let path = env.root_dir()?.join(&name);
        let scope = resolve_package(args.package.as_deref(), args.this, cwd)?;

        debug!(workspace = %name, path = %path.display(), package = %scope, "resolved workspace");

        Ok(Self { name, path, scope })
    }

    /// Resolves using the live process environment and working directory.
    ///
    /// # Errors
    ///
    /// See [`ResolvedWorkspace::resolve`]; also fails if the current
    /// directory cannot be read.
    pub fn from_process(args: &WorkspaceArgs) -> Result<Self> {
        // ---
        let cwd = env::current_dir().context("failed to read current directory")?;
        Self::resolve(args, &WorkspaceEnv::from_process(), &cwd)
    }
}

/// Picks the package scope from `--package` and `--this`.
///
/// `--this` takes the base name of `cwd` and wins over any explicit package.
/// An empty package name selects the whole workspace.
///
/// # Errors
///
/// Returns error if `this` is set and `cwd` has no base name.
pub fn resolve_package(package: Option<&str>, this: bool, cwd: &Path) -> Result<PackageScope> {
    // ---
    if this {
        let Some(name) = cwd.file_name() else {
            bail!("--this used in {}, which has no directory name", cwd.display());
        };
        let name = name.to_string_lossy().into_owned();
        info!("Set this package {name}");
        return Ok(PackageScope::UpTo(name));
    }

    Ok(match package {
        Some(p) if !p.is_empty() => PackageScope::UpTo(p.to_string()),
        _ => PackageScope::All,
    })
}

/// Changes into a directory and changes back when dropped.
///
/// The working directory is process-global; hold at most one guard at a time.
#[derive(Debug)]
pub struct WorkdirGuard {
    // ---
    original: PathBuf,
}

impl WorkdirGuard {
    // ---
    /// Enters `path`, remembering the directory to return to.
    ///
    /// # Errors
    ///
    /// Returns error if the current directory cannot be read or `path`
    /// cannot be entered. The working directory is unchanged on error.
    pub fn enter(path: &Path) -> Result<Self> {
        // ---
        let original = env::current_dir().context("failed to read current directory")?;

        env::set_current_dir(path)
            .with_context(|| format!("failed to enter workspace {}", path.display()))?;
        debug!("entered {}", path.display());

        Ok(Self { original })
    }

    /// The directory that will be restored on drop.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        // ---
        match env::set_current_dir(&self.original) {
            Ok(()) => debug!("restored {}", self.original.display()),
            Err(e) => warn!("failed to restore {}: {}", self.original.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serial_test::serial;

    fn env_with(root: Option<&str>, home: Option<&str>) -> WorkspaceEnv {
        // ---
        WorkspaceEnv {
            root: root.map(OsString::from),
            home: home.map(OsString::from),
        }
    }

    fn args(workspace: Option<&str>, package: Option<&str>, this: bool) -> WorkspaceArgs {
        // ---
        WorkspaceArgs {
            workspace: workspace.map(String::from),
            package: package.map(String::from),
            this,
        }
    }

    #[test]
    fn test_root_env_and_workspace_name() {
        // ---
        let env = env_with(Some("/tmp/x"), Some("/home/dev"));
        let ws = ResolvedWorkspace::resolve(&args(Some("foo"), None, false), &env, Path::new("/"))
            .expect("resolve failed");

        assert_eq!(ws.path, PathBuf::from("/tmp/x/foo"));
        assert_eq!(ws.name, "foo");
        assert_eq!(ws.scope, PackageScope::All);
    }

    #[test]
    fn test_falls_back_to_home() {
        // ---
        let env = env_with(None, Some("/home/dev"));
        let ws = ResolvedWorkspace::resolve(&args(None, None, false), &env, Path::new("/"))
            .expect("resolve failed");

        assert_eq!(ws.path, PathBuf::from("/home/dev/ros2_ws"));
        assert_eq!(ws.name, DEFAULT_WORKSPACE);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        // ---
        let env = env_with(Some(""), Some("/home/dev"));
        let ws = ResolvedWorkspace::resolve(&args(Some(""), None, false), &env, Path::new("/"))
            .expect("resolve failed");

        assert_eq!(ws.path, PathBuf::from("/home/dev/ros2_ws"));
    }

    #[test]
    fn test_no_root_is_an_error() {
        // ---
        let err = env_with(None, None).root_dir().unwrap_err();
        assert!(err.to_string().contains(ROOT_ENV));
    }

    #[test]
    fn test_package_selection() {
        // ---
        let cwd = Path::new("/home/dev/ros2_ws/src/my_pkg");

        assert_eq!(resolve_package(None, false, cwd).unwrap(), PackageScope::All);
        assert_eq!(resolve_package(Some(""), false, cwd).unwrap(), PackageScope::All);
        assert_eq!(
            resolve_package(Some("demo"), false, cwd).unwrap(),
            PackageScope::UpTo("demo".into())
        );
        assert_eq!(
            resolve_package(None, true, cwd).unwrap(),
            PackageScope::UpTo("my_pkg".into())
        );
    }

    #[test]
    fn test_this_overrides_package() {
        // ---
        let env = env_with(Some("/tmp/x"), None);
        let cwd = Path::new("/tmp/x/ros2_ws/src/talker");
        let ws = ResolvedWorkspace::resolve(&args(None, Some("listener"), true), &env, cwd)
            .expect("resolve failed");

        assert_eq!(ws.scope, PackageScope::UpTo("talker".into()));
        assert_eq!(ws.scope.to_string(), "talker");
    }

    #[test]
    fn test_this_at_filesystem_root() {
        // ---
        assert!(resolve_package(None, true, Path::new("/")).is_err());
    }

    #[test]
    #[serial]
    fn test_guard_restores_directory() {
        // ---
        let before = env::current_dir().expect("cwd");
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().canonicalize().expect("canonicalize");

        {
            let guard = WorkdirGuard::enter(&target).expect("enter failed");
            assert_eq!(guard.original(), before.as_path());
            assert_eq!(env::current_dir().expect("cwd"), target);
        }

        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    #[serial]
    fn test_guard_missing_directory() {
        // ---
        let before = env::current_dir().expect("cwd");
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no_such_ws");

        let err = WorkdirGuard::enter(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to enter workspace"));
        assert_eq!(env::current_dir().expect("cwd"), before);
    }
}
