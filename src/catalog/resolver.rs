//! Content root resolution.
//!
//! The server is usually launched from inside the repository that holds the
//! catalog, but it can also be installed elsewhere and pointed at the
//! content through `FEATURE_KIT_PATH`. Strategies are tried in order and the
//! first hit wins:
//!
//! 1. **Local development**: two levels above the install directory.
//! 2. **Environment**: the explicit override, if the path exists.
//! 3. **Ancestor search**: up to [`ANCESTOR_STEPS`] steps upward, each
//!    testing three levels above the current directory.
//! 4. **Unverified**: the local development candidate, unchecked.
//!
//! Resolution never fails. A root that turns out to be wrong surfaces later
//! as an empty index.

use std::path::{Path, PathBuf};

use super::FEATURES_SUBPATH;

/// Environment variable naming an explicit content root.
pub const FEATURE_KIT_PATH_ENV: &str = "FEATURE_KIT_PATH";

/// How many directories the ancestor search climbs.
pub const ANCESTOR_STEPS: usize = 5;

/// Filesystem existence checks, injectable for tests.
pub trait PathProbe {
    /// Returns `true` if `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// [`PathProbe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Inputs to [`resolve_root`].
#[derive(Debug, Clone, Default)]
pub struct ResolveInputs {
    /// Directory the server binary lives in.
    pub install_dir: PathBuf,
    /// Explicit content root, from the environment or configuration.
    pub env_override: Option<PathBuf>,
}

/// Which strategy produced the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    /// Two levels above the install directory.
    LocalDev,
    /// The explicit override.
    Environment,
    /// Found by the upward search after the given number of steps.
    Ancestor(usize),
    /// Nothing matched; the local development candidate is returned as-is.
    Unverified,
}

/// A resolved content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The content root.
    pub root: PathBuf,
    /// How it was found.
    pub source: RootSource,
}

impl Resolution {
    /// Returns `false` for the unchecked fallback.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.source != RootSource::Unverified
    }
}

/// Determines the content root.
#[must_use]
pub fn resolve_root(inputs: &ResolveInputs, probe: &impl PathProbe) -> Resolution {
    let has_features = |root: &Path| probe.exists(&root.join(FEATURES_SUBPATH));

    let local_dev = up(&inputs.install_dir, 2);
    if has_features(&local_dev) {
        return Resolution {
            root: local_dev,
            source: RootSource::LocalDev,
        };
    }

    if let Some(ref path) = inputs.env_override {
        if probe.exists(path) {
            return Resolution {
                root: path.clone(),
                source: RootSource::Environment,
            };
        }
    }

    let mut current = inputs.install_dir.clone();
    for step in 0..ANCESTOR_STEPS {
        let candidate = up(&current, 3);
        if has_features(&candidate) {
            return Resolution {
                root: candidate,
                source: RootSource::Ancestor(step),
            };
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    Resolution {
        root: local_dev,
        source: RootSource::Unverified,
    }
}

/// Directory containing the running executable.
///
/// Falls back to the working directory when the executable path is
/// unavailable.
#[must_use]
pub fn install_dir_from_exe() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Walks `levels` parents up, stopping at the filesystem root.
fn up(path: &Path, levels: usize) -> PathBuf {
    let mut out = path;
    for _ in 0..levels {
        match out.parent() {
            Some(parent) => out = parent,
            None => break,
        }
    }
    out.to_path_buf()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Probe that only knows about an explicit set of paths.
    struct FakeFs(HashSet<PathBuf>);

    impl FakeFs {
        fn with(paths: &[&str]) -> Self {
            Self(paths.iter().map(PathBuf::from).collect())
        }
    }

    impl PathProbe for FakeFs {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn inputs(install: &str, env: Option<&str>) -> ResolveInputs {
        ResolveInputs {
            install_dir: PathBuf::from(install),
            env_override: env.map(PathBuf::from),
        }
    }

    #[test]
    fn local_dev_layout() {
        let fs = FakeFs::with(&["/repo/sandbox/variant-1/features"]);
        let r = resolve_root(&inputs("/repo/mcp-server/bin", None), &fs);
        assert_eq!(r.root, PathBuf::from("/repo"));
        assert_eq!(r.source, RootSource::LocalDev);
        assert!(r.is_verified());
    }

    #[test]
    fn local_dev_outranks_environment() {
        let fs = FakeFs::with(&["/repo/sandbox/variant-1/features", "/elsewhere"]);
        let r = resolve_root(&inputs("/repo/mcp-server/bin", Some("/elsewhere")), &fs);
        assert_eq!(r.root, PathBuf::from("/repo"));
        assert_eq!(r.source, RootSource::LocalDev);
    }

    #[test]
    fn environment_override_needs_only_to_exist() {
        let fs = FakeFs::with(&["/elsewhere"]);
        let r = resolve_root(&inputs("/opt/kit/bin", Some("/elsewhere")), &fs);
        assert_eq!(r.root, PathBuf::from("/elsewhere"));
        assert_eq!(r.source, RootSource::Environment);
    }

    #[test]
    fn missing_environment_override_is_skipped() {
        let fs = FakeFs::with(&[]);
        let r = resolve_root(&inputs("/opt/kit/bin", Some("/gone")), &fs);
        assert_eq!(r.source, RootSource::Unverified);
    }

    #[test]
    fn ancestor_search_climbs() {
        // install dir is nested two levels deeper than the local-dev layout expects
        let fs = FakeFs::with(&["/repo/sandbox/variant-1/features"]);
        let r = resolve_root(&inputs("/repo/mcp-server/target/release/deps", None), &fs);
        assert_eq!(r.root, PathBuf::from("/repo"));
        assert_eq!(r.source, RootSource::Ancestor(1));
    }

    #[test]
    fn ancestor_search_is_bounded() {
        let fs = FakeFs::with(&["/repo/sandbox/variant-1/features"]);
        let r = resolve_root(&inputs("/repo/a/b/c/d/e/f/g/h/i", None), &fs);
        assert_eq!(r.source, RootSource::Unverified);
    }

    #[test]
    fn unverified_fallback_is_local_dev_candidate() {
        let fs = FakeFs::with(&[]);
        let r = resolve_root(&inputs("/repo/mcp-server/bin", None), &fs);
        assert_eq!(r.root, PathBuf::from("/repo"));
        assert_eq!(r.source, RootSource::Unverified);
        assert!(!r.is_verified());
    }

    #[test]
    fn shallow_install_dir_stops_at_root() {
        let fs = FakeFs::with(&["/sandbox/variant-1/features"]);
        let r = resolve_root(&inputs("/", None), &fs);
        assert_eq!(r.root, PathBuf::from("/"));
        assert_eq!(r.source, RootSource::LocalDev);
    }

    #[test]
    fn fs_probe_sees_real_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsProbe.exists(dir.path()));
        assert!(!FsProbe.exists(&dir.path().join("missing")));
    }
}
