//! Bundler adapter - scratch layout and external bundler invocation.
//!
//! Budgie does not bundle JavaScript itself. Each route's combined module
//! body is written to a deterministic path under the scratch directory and
//! handed to the configured external bundler, which inlines the module graph
//! into one self-contained output file at a sibling path.

use std::path::{Path, PathBuf};
use std::process::Command;

use which::which;

use crate::config::BundlerConfig;
use crate::core::{BudgetError, Route};

/// Bundling capability: one entry module in, one self-contained file out.
pub trait Bundler: Send + Sync {
    fn bundle(&self, entry: &Path, outfile: &Path) -> Result<(), BudgetError>;
}

// ============================================================================
// Scratch layout
// ============================================================================

/// Per-route scratch paths: combined entry module and bundled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    pub entry: PathBuf,
    pub outfile: PathBuf,
}

/// Derive stable scratch paths for a route.
///
/// Filesystem-unsafe characters in dynamic segments are replaced (`$` -> `_`)
/// and the root route maps to an `index` file so it does not collide with the
/// scratch directory itself. Paths are stable across runs, so repeated
/// invocations overwrite rather than accumulate files.
pub fn scratch_paths(scratch_dir: &Path, route: &Route) -> ScratchPaths {
    let stem = if route.is_root() {
        "index".to_string()
    } else {
        route.as_str().trim_start_matches('/').replace('$', "_")
    };
    ScratchPaths {
        entry: scratch_dir.join(format!("{stem}.mjs")),
        outfile: scratch_dir.join(format!("{stem}-out.js")),
    }
}

/// Write a route's combined module body to its scratch entry path.
pub fn write_entry(paths: &ScratchPaths, body: &str) -> Result<(), BudgetError> {
    let io_err = |e: std::io::Error| BudgetError::Bundle {
        detail: format!("cannot write scratch entry: {e}"),
    };

    if let Some(parent) = paths.entry.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(&paths.entry, body).map_err(io_err)
}

// ============================================================================
// External CLI bundler
// ============================================================================

/// External CLI bundler with an esbuild-compatible argument shape.
///
/// Invoked as `<command..> <entry> --bundle --outfile=<outfile>`.
pub struct CliBundler {
    program: PathBuf,
    prefix_args: Vec<String>,
}

impl CliBundler {
    /// Resolve the configured command on PATH.
    pub fn from_config(config: &BundlerConfig) -> Result<Self, BudgetError> {
        let mut parts = config.command.iter();
        let name = parts.next().ok_or_else(|| BudgetError::Bundle {
            detail: "empty bundle command".to_string(),
        })?;
        let program = which(name).map_err(|e| BudgetError::Bundle {
            detail: format!("bundler `{name}` not found: {e}"),
        })?;
        Ok(Self {
            program,
            prefix_args: parts.cloned().collect(),
        })
    }
}

impl Bundler for CliBundler {
    fn bundle(&self, entry: &Path, outfile: &Path) -> Result<(), BudgetError> {
        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .arg(entry)
            .arg("--bundle")
            .arg(format!("--outfile={}", outfile.display()))
            .arg("--log-level=warning")
            .output()
            .map_err(|e| BudgetError::Bundle {
                detail: format!("failed to spawn bundler: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BudgetError::Bundle {
                detail: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn route(rel: &str) -> Route {
        Route::from_page_file(Path::new(rel))
    }

    #[test]
    fn test_root_route_maps_to_index() {
        let paths = scratch_paths(Path::new("/p/.budgie"), &Route::root());
        assert_eq!(paths.entry, PathBuf::from("/p/.budgie/index.mjs"));
        assert_eq!(paths.outfile, PathBuf::from("/p/.budgie/index-out.js"));
    }

    #[test]
    fn test_plain_route() {
        let paths = scratch_paths(Path::new("/p/.budgie"), &route("about.mjs"));
        assert_eq!(paths.entry, PathBuf::from("/p/.budgie/about.mjs"));
        assert_eq!(paths.outfile, PathBuf::from("/p/.budgie/about-out.js"));
    }

    #[test]
    fn test_nested_route_keeps_directories() {
        let paths = scratch_paths(Path::new("/p/.budgie"), &route("docs/intro.mjs"));
        assert_eq!(paths.entry, PathBuf::from("/p/.budgie/docs/intro.mjs"));
        assert_eq!(paths.outfile, PathBuf::from("/p/.budgie/docs/intro-out.js"));
    }

    #[test]
    fn test_dynamic_segment_is_sanitized() {
        let paths = scratch_paths(Path::new("/p/.budgie"), &route("item/$id.mjs"));
        assert_eq!(paths.entry, PathBuf::from("/p/.budgie/item/_id.mjs"));
    }

    #[test]
    fn test_write_entry_creates_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let paths = scratch_paths(temp.path(), &route("docs/intro.mjs"));

        write_entry(&paths, "console.log(1)").unwrap();
        assert_eq!(
            std::fs::read_to_string(&paths.entry).unwrap(),
            "console.log(1)"
        );
    }

    #[test]
    fn test_write_entry_overwrites() {
        let temp = TempDir::new().unwrap();
        let paths = scratch_paths(temp.path(), &Route::root());

        write_entry(&paths, "first").unwrap();
        write_entry(&paths, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&paths.entry).unwrap(), "second");
    }

    #[test]
    fn test_unknown_bundler_command() {
        let config = BundlerConfig {
            command: vec!["definitely-not-a-real-bundler-9000".to_string()],
        };
        let err = CliBundler::from_config(&config).unwrap_err();
        assert!(matches!(err, BudgetError::Bundle { .. }));
    }

    #[test]
    fn test_empty_bundler_command() {
        let config = BundlerConfig { command: vec![] };
        let err = CliBundler::from_config(&config).unwrap_err();
        assert!(matches!(err, BudgetError::Bundle { .. }));
    }
}
