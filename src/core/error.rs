//! Measurement error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while measuring route payloads.
///
/// Only `Filesystem` aborts a whole run. Every other variant is scoped to a
/// single route: it is caught at the route task boundary and turned into a
/// degraded or omitted table row, never propagated to sibling routes.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Pages root missing or unreadable.
    #[error("cannot read pages directory `{path}`")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unterminated `<script>` markup in rendered HTML.
    #[error("malformed script markup: {detail}")]
    Parse { detail: String },

    /// A `/_public` script reference with no file behind it.
    #[error("missing local asset `{path}`")]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered-markup or remote-script fetch failed.
    #[error("fetch failed for `{url}`: {detail}")]
    Network { url: String, detail: String },

    /// The external bundler could not be spawned or exited nonzero.
    #[error("bundling failed: {detail}")]
    Bundle { detail: String },
}

impl BudgetError {
    /// Short marker shown in the table's size column for failed routes.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "fs error",
            Self::Parse { .. } => "parse error",
            Self::MissingAsset { .. } => "missing asset",
            Self::Network { .. } => "fetch error",
            Self::Bundle { .. } => "bundle error",
        }
    }
}
