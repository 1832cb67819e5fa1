//! # Path Resolver
//!
//! Computes the five standard directories of a deployment.
//!
//! Each [`PathKind`] has an OS-convention default,
//! `<base>/<token>-core/<network>`, where `<base>` comes from the `dirs` crate
//! (temp: the system temp dir plus the user name). An environment override
//! `CORE_PATH_<KIND>` always wins over the default: a leading `~` is expanded
//! and relative values are made absolute against the current directory.
//!
//! Defaults are created when missing. An override names a directory the
//! operator owns, so it must already exist; otherwise resolution fails with
//! [`Error::DirectoryNotFound`].
//!
//! The resolved value is written back to `CORE_PATH_<KIND>`, whether or not an
//! override was supplied.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::kernel::constants::{PATH_SUFFIX, env, keys};
use crate::kernel::environment::Environment;
use crate::kernel::error::{Error, Result};
use crate::kernel::namespace::Namespace;

/// The standard per-purpose directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathKind {
    Data,
    Config,
    Cache,
    Log,
    Temp,
}

impl PathKind {
    /// All kinds, in resolution order
    pub const ALL: [PathKind; 5] = [
        PathKind::Data,
        PathKind::Config,
        PathKind::Cache,
        PathKind::Log,
        PathKind::Temp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::Data => "data",
            PathKind::Config => "config",
            PathKind::Cache => "cache",
            PathKind::Log => "log",
            PathKind::Temp => "temp",
        }
    }

    /// Override variable, e.g. `CORE_PATH_DATA`
    pub fn env_var(&self) -> String {
        format!("{}{}", env::CORE_PATH_PREFIX, self.as_str().to_uppercase())
    }

    /// Binding key, e.g. `path.data`
    pub fn binding_key(&self) -> String {
        format!("{}{}", keys::PATH_PREFIX, self.as_str())
    }

    /// OS base directory this kind lives under when no override is given.
    fn base_dir(&self, environment: &Environment) -> Option<PathBuf> {
        match self {
            PathKind::Data => dirs::data_dir(),
            PathKind::Config => dirs::config_dir(),
            PathKind::Cache => dirs::cache_dir(),
            PathKind::Log => dirs::state_dir().or_else(dirs::data_local_dir),
            PathKind::Temp => {
                let user = environment
                    .get_non_empty("USER")
                    .or_else(|| environment.get_non_empty("USERNAME"))
                    .unwrap_or_else(|| PATH_SUFFIX.to_string());
                Some(std::env::temp_dir().join(user))
            }
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a resolved path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Override,
    Default,
}

/// Result of resolving one path kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub kind: PathKind,
    pub resolved: PathBuf,
    pub source: PathSource,
}

/// Resolves path kinds for one namespace against an environment table.
#[derive(Debug)]
pub struct PathResolver<'a> {
    environment: &'a Environment,
    namespace: &'a Namespace,
}

impl<'a> PathResolver<'a> {
    pub fn new(environment: &'a Environment, namespace: &'a Namespace) -> Self {
        Self {
            environment,
            namespace,
        }
    }

    /// The OS-convention default for `kind`, without touching the filesystem.
    pub fn default_path(&self, kind: PathKind) -> Result<PathBuf> {
        let base = kind
            .base_dir(self.environment)
            .ok_or_else(|| Error::PathResolutionFailed {
                kind: kind.to_string(),
                reason: "no OS base directory available".to_string(),
            })?;
        Ok(base
            .join(format!("{}-{}", self.namespace.token(), PATH_SUFFIX))
            .join(self.namespace.network()))
    }

    /// Resolve `kind` and publish the result to the environment.
    pub fn resolve(&self, kind: PathKind) -> Result<PathEntry> {
        let var = kind.env_var();
        let entry = match self.environment.get_non_empty(&var) {
            Some(raw) => {
                let resolved = absolutize(expand_home_dir(&raw))?;
                ensure_directory(&resolved)?;
                PathEntry {
                    kind,
                    resolved,
                    source: PathSource::Override,
                }
            }
            None => {
                let resolved = self.default_path(kind)?;
                std::fs::create_dir_all(&resolved)
                    .map_err(|e| Error::io(e, "create default directory", resolved.clone()))?;
                PathEntry {
                    kind,
                    resolved,
                    source: PathSource::Default,
                }
            }
        };

        self.environment
            .set(&var, &entry.resolved.to_string_lossy());
        log::debug!(
            "Resolved {} path to {} ({:?})",
            kind,
            entry.resolved.display(),
            entry.source
        );
        Ok(entry)
    }

    /// Resolve every kind in [`PathKind::ALL`] order, failing on the first error.
    pub fn resolve_all(&self) -> Result<Vec<PathEntry>> {
        PathKind::ALL.iter().map(|kind| self.resolve(*kind)).collect()
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home_dir(raw: &str) -> PathBuf {
    let home = match dirs::home_dir() {
        Some(home) => home,
        None => return PathBuf::from(raw),
    };
    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| Error::io(e, "read current directory", path.clone()))?;
    Ok(cwd.join(path))
}

/// Fail with `DirectoryNotFound` unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::DirectoryNotFound {
            path: path.to_path_buf(),
        })
    }
}
