// src/common/error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image decode failed for {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image data decode failed: {0}")]
    ImageData(#[from] image::ImageError),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Network request failed: {0}")]
    NetworkRequestFailed(#[from] reqwest::Error),

    #[error("Weather API error: HTTP {0}")]
    WeatherStatus(u16),

    #[error("Weather payload missing field: {0}")]
    WeatherPayload(&'static str),

    #[error("Time conversion error: {0}")]
    TimeError(#[from] jiff::Error),

    #[error("Network scan failed: {0}")]
    ScanFailed(String),

    #[error("Image directory {0} contains no files")]
    EmptyImageDir(PathBuf),

    #[error("GPIO error: {0}")]
    GpioError(String),

    #[error("Display initialization failed")]
    DisplayInit,

    #[error("Display update failed")]
    DisplayUpdateFailed,
}

impl AppError {
    /// 携带路径的 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = core::result::Result<T, AppError>;
