//! Errors for the scenario runner.

use thiserror::Error;

use fog_core::FogError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid grid: {0}")]
    Fog(#[from] FogError),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("frame on line {line} has {cells} cells, expected {expected}")]
    MalformedFrame {
        line: usize,
        cells: usize,
        expected: usize,
    },
}
