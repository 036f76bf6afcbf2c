//! Configuration system for callscope.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod callscope_config;
pub mod graph_config;
pub mod impact_config;
pub mod scan_config;

pub use callscope_config::{CallscopeConfig, CliOverrides};
pub use graph_config::GraphConfig;
pub use impact_config::ImpactConfig;
pub use scan_config::ScanConfig;
