pub mod config;

pub use config::{ConfigError, ProjectConfig, parse_project_name};
