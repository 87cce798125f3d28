// Configuration module
//
// Everything is read from environment variables once at process start:
//
//   BUCKET          primary image bucket (originals and resized variants)
//   URL             base URL of the redirect location
//   CONF_BUCKET     bucket holding the supported-dimensions blob
//   CONF_FILE       key of the supported-dimensions blob
//   LISTEN_ADDRESS  bind address (default 0.0.0.0)
//   PORT            bind port (default 8080)
//   S3_ENDPOINT     custom S3 endpoint, enables path-style addressing
//   RESIZE_FIT      cover | fill (default cover)
//   JPEG_QUALITY    1-100 (default 80)
//   MAX_DIMENSION   largest width or height ever rendered (default 10000)
//   MAX_PIXELS      largest width * height ever rendered (default 100000000)

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::resizer::{
    DimensionLimits, FitMode, ResizeOptions, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS,
    DEFAULT_QUALITY,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Process-wide configuration, immutable after startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Bucket holding originals and resized variants
    pub bucket: String,
    /// Base of the redirect `Location`, joined to the key with `/`
    pub url: String,
    /// Bucket holding the dimension configuration blob
    pub conf_bucket: String,
    /// Key of the dimension configuration blob
    pub conf_file: String,

    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub s3_endpoint: Option<String>,
    #[serde(default)]
    pub resize_fit: FitMode,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

impl Config {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default())
    }

    /// Load and validate configuration from an explicit variable map.
    ///
    /// Names are matched case-insensitively, exactly like [`Config::from_env`].
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default().source(Some(vars)))
    }

    fn load(source: ::config::Environment) -> Result<Self, ConfigError> {
        let config: Config = ::config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("BUCKET", &self.bucket),
            ("URL", &self.url),
            ("CONF_BUCKET", &self.conf_bucket),
            ("CONF_FILE", &self.conf_file),
            ("LISTEN_ADDRESS", &self.listen_address),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "JPEG_QUALITY must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.max_dimension == 0 || self.max_pixels == 0 {
            return Err(ConfigError::Invalid(
                "MAX_DIMENSION and MAX_PIXELS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Custom S3 endpoint, if one is set and non-empty
    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }

    pub fn dimension_limits(&self) -> DimensionLimits {
        DimensionLimits {
            max_dimension: self.max_dimension,
            max_pixels: self.max_pixels,
        }
    }

    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            fit: self.resize_fit,
            quality: self.jpeg_quality,
            limits: self.dimension_limits(),
        }
    }
}
