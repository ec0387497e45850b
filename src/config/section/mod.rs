//! Configuration section definitions.

mod build;
mod bundler;
mod serve;
mod threshold;

pub use build::BuildConfig;
pub use bundler::BundlerConfig;
pub use serve::ServeConfig;
pub use threshold::ThresholdConfig;
