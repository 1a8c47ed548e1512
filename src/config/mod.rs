pub mod defaults;
pub mod settings;

pub use settings::{Config, DiscoveryConfig, OutputConfig, OutputFormat, TrackerConfig};
