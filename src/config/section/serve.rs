//! `[serve]` section configuration.
//!
//! Points at the external dev server that renders routes. Budgie never
//! serves HTTP itself; it only fetches `http://<host>:<port><route>`.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! host = "localhost"
//! port = 3333
//! ```

use serde::{Deserialize, Serialize};

/// Rendered-markup endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Host name of the dev server.
    pub host: String,

    /// HTTP port number of the dev server.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3333,
        }
    }
}
