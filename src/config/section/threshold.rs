//! `[budget]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [budget]
//! payload_size = 50000    # Bytes; unset disables severity coloring
//! ```

use serde::{Deserialize, Serialize};

/// Payload budget threshold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Maximum acceptable bundled size per route, in bytes.
    ///
    /// When set, the size column is classified three ways: at/above the
    /// threshold, at/above 80% of it, or below. When unset every size is
    /// reported in a neutral style.
    pub payload_size: Option<u64>,
}
