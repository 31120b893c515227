mod app_config;
mod config;
pub mod geometry;

use thiserror::Error;

pub use app_config::{AppConfig, AssistantConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geometry::{centroid, normalize_bbox, BBox, Coordinate};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
