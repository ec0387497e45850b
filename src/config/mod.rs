//! Project configuration management for `budgie.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[build]`  | Project layout (pages, public, scratch)          |
//! | `[serve]`  | Dev server endpoint rendering the routes         |
//! | `[budget]` | Payload size threshold for severity coloring     |
//! | `[bundle]` | External bundler command                         |
//!
//! The config file is optional: budgie is a companion tool and runs with
//! defaults (threshold unset, project root = cwd) when no `budgie.toml`
//! is found.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{BuildConfig, BundlerConfig, ServeConfig, ThresholdConfig};

use crate::cli::{Cli, Commands};
use crate::core::Route;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing budgie.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Project layout settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Dev server endpoint settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Budget threshold settings
    #[serde(default)]
    pub budget: ThresholdConfig,

    /// External bundler settings
    #[serde(default)]
    pub bundle: BundlerConfig,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            build: BuildConfig::default(),
            serve: ServeConfig::default(),
            budget: ThresholdConfig::default(),
            bundle: BundlerConfig::default(),
        }
    }
}

impl BudgetConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory. A missing config file is not an
    /// error: defaults apply and the project root is the cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let content = fs::read_to_string(&path)
                    .map_err(|e| ConfigError::Io(path.clone(), e))
                    .with_context(|| format!("failed to read {}", path.display()))?;

                let (mut config, ignored) = Self::parse_with_ignored(&content)?;
                if !ignored.is_empty() {
                    print_unknown_fields_warning(&ignored, &path);
                }

                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                config.config_path = path;
                config
            }
            None => {
                let mut config = Self::default();
                config.root = std::env::current_dir().context("cannot determine cwd")?;
                config
            }
        };

        config.apply_cli_overrides(cli);
        Ok(config)
    }

    /// Parse config, collecting unknown fields instead of failing on them.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply per-command CLI overrides (port, pages directory).
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        let (Commands::Report { port, pages } | Commands::Watch { port, pages }) = &cli.command;
        if let Some(port) = port {
            self.serve.port = *port;
        }
        if let Some(pages) = pages {
            self.build.pages = pages.clone();
        }
    }

    // ------------------------------------------------------------------------
    // Resolved paths
    // ------------------------------------------------------------------------

    /// Pages root, resolved against the project root.
    pub fn pages_dir(&self) -> PathBuf {
        self.root.join(&self.build.pages)
    }

    /// Public asset directory, resolved against the project root.
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.build.public)
    }

    /// Scratch directory, resolved against the project root.
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(&self.build.scratch)
    }

    /// Rendered-markup URL for a route on the configured dev server.
    pub fn endpoint(&self, route: &Route) -> String {
        format!("http://{}:{}{}", self.serve.host, self.serve.port, route)
    }
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path or exists in cwd
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

/// Parse a config string for tests (panics on parse errors).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BudgetConfig {
    let (config, _) = BudgetConfig::parse_with_ignored(content).expect("config should parse");
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            BudgetConfig::parse_with_ignored("[serve]\nport = 3000\nnope = true\n[what]\na = 1")
                .unwrap();
        assert!(ignored.contains(&"serve.nope".to_string()));
        assert!(ignored.iter().any(|f| f.starts_with("what")));
    }

    #[test]
    fn test_endpoint_composition() {
        let config = test_parse_config("[serve]\nhost = \"localhost\"\nport = 3333");
        assert_eq!(config.endpoint(&Route::root()), "http://localhost:3333/");

        let about = Route::from_page_file(Path::new("about.mjs"));
        assert_eq!(config.endpoint(&about), "http://localhost:3333/about");
    }

    #[test]
    fn test_resolved_paths() {
        let mut config = test_parse_config("");
        config.root = PathBuf::from("/project");

        assert_eq!(config.pages_dir(), PathBuf::from("/project/app/pages"));
        assert_eq!(config.public_dir(), PathBuf::from("/project/public"));
        assert_eq!(config.scratch_dir(), PathBuf::from("/project/.budgie"));
    }
}
