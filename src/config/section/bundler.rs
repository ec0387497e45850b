//! `[bundle]` section configuration.
//!
//! The bundler is an external tool. Budgie writes one combined entry module
//! per route and asks the configured command to produce a single
//! self-contained output file from it.
//!
//! # Example
//!
//! ```toml
//! [bundle]
//! command = ["esbuild"]           # or ["npx", "esbuild"]
//! ```

use serde::{Deserialize, Serialize};

/// External bundler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Command prefix (e.g. `["esbuild"]` or `["npx", "esbuild"]`).
    /// Entry point, `--bundle` and `--outfile` are appended per route.
    pub command: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: vec!["esbuild".to_string()],
        }
    }
}
