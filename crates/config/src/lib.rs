//! UODecode Configuration Management
//!
//! Loads the decoder settings file (`decoder.txt`): one `key = value` per
//! line, `#` comments and blank lines ignored.

use std::fs;
use std::path::Path;
use uodecode_core::{ClientVersion, ProtocolEra};

/// Errors raised while loading the settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Decoder settings for one connection
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Negotiated client version (from "client_version" option, default: 7.0.34.6)
    pub client_version: ClientVersion,
    /// Bodies larger than this are rejected before decode (from "max_body_length" option)
    pub max_body_length: usize,
    /// Consecutive underruns treated as a desync (from "desync_threshold" option)
    pub desync_threshold: u32,
    /// Tracing filter (from "log_level" option)
    pub log_level: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            client_version: ClientVersion::default(),
            max_body_length: 65535,
            desync_threshold: 2,
            log_level: "info".into(),
        }
    }
}

impl DecoderConfig {
    /// Load and validate configuration from a settings file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings file content
    ///
    /// Unknown keys are logged and ignored. Values that fail to parse are
    /// reported with their line number.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse {
                    line: index + 1,
                    message: format!("expected `key = value`, got `{}`", line),
                });
            };

            config
                .parse_option(key.trim(), value.trim())
                .map_err(|message| ConfigError::Parse {
                    line: index + 1,
                    message,
                })?;
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "client_version" => {
                self.client_version = value.parse().map_err(|e| format!("{}", e))?;
            }
            "max_body_length" => {
                self.max_body_length = value
                    .parse()
                    .map_err(|_| format!("max_body_length: `{}` is not a number", value))?;
            }
            "desync_threshold" => {
                self.desync_threshold = value
                    .parse()
                    .map_err(|_| format!("desync_threshold: `{}` is not a number", value))?;
            }
            "log_level" => self.log_level = value.into(),
            _ => {
                tracing::warn!("Unknown config option: {} = {}", key, value);
            }
        }
        Ok(())
    }

    /// Reject settings the caller policy cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_body_length == 0 {
            return Err(ConfigError::Invalid("max_body_length must be positive".into()));
        }
        if self.desync_threshold == 0 {
            return Err(ConfigError::Invalid("desync_threshold must be positive".into()));
        }
        Ok(())
    }

    /// Protocol era handed to every dispatch call
    pub fn protocol_era(&self) -> ProtocolEra {
        ProtocolEra::new(self.client_version)
    }

    /// Display configuration summary
    pub fn display(&self) {
        tracing::info!("Decoder configuration:");
        tracing::info!("  Client version: {}", self.client_version);
        tracing::info!("  Max body length: {} bytes", self.max_body_length);
        tracing::info!("  Desync threshold: {} underrun(s)", self.desync_threshold);
        tracing::info!("  Log level: {}", self.log_level);
    }
}
