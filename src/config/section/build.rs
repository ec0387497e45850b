//! `[build]` section configuration.
//!
//! Project layout paths, all relative to the project root.
//!
//! # Example
//!
//! ```toml
//! [build]
//! pages = "app/pages"     # Page-definition files (one file per route)
//! public = "public"       # Static asset tree served under /_public
//! scratch = ".budgie"     # Working area for per-route bundle artifacts
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Project layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory of page-definition files.
    pub pages: PathBuf,

    /// Public asset directory backing `/_public` script references.
    pub public: PathBuf,

    /// Scratch directory for combined entries and bundled outputs.
    /// Watch mode ignores changes under this directory.
    pub scratch: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            pages: PathBuf::from("app/pages"),
            public: PathBuf::from("public"),
            scratch: PathBuf::from(".budgie"),
        }
    }
}
