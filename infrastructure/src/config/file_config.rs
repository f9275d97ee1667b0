//! Raw TOML configuration data types.
//!
//! These structs represent the exact structure of the config file and are
//! deserialized directly.

use plenum_domain::SessionKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("chamber name cannot be empty")]
    EmptyChamberName,

    #[error("unknown default_session_kind '{0}'")]
    UnknownSessionKind(String),
}

/// Complete file configuration (raw TOML structure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chamber settings
    pub chamber: FileChamberConfig,
    /// Agenda template settings
    pub templates: FileTemplatesConfig,
    /// Event log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.chamber.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyChamberName);
        }

        // The kind string only becomes a SessionKind at session creation;
        // refuse a default that could never parse.
        if self.chamber.default_session_kind.parse::<SessionKind>().is_err() {
            return Err(ConfigValidationError::UnknownSessionKind(
                self.chamber.default_session_kind.clone(),
            ));
        }

        Ok(())
    }
}

/// Chamber settings: who sits here and what a default sitting looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChamberConfig {
    /// Display name used in console headers.
    pub name: String,
    /// Expected roster size, used as a quorum hint before roll call.
    pub member_count: u32,
    /// Default kind for new sessions: "ordinary", "special" or "solemn".
    pub default_session_kind: String,
}

impl Default for FileChamberConfig {
    fn default() -> Self {
        Self {
            name: "Plenary".to_string(),
            member_count: 0,
            default_session_kind: "ordinary".to_string(),
        }
    }
}

/// Where agenda templates are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTemplatesConfig {
    /// Directory containing one `<template-id>.toml` per template.
    pub dir: PathBuf,
}

impl Default for FileTemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
        }
    }
}

/// Event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL session event log path; `None` disables the file sink.
    pub events_file: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            events_file: Some(PathBuf::from("plenum.events.jsonl")),
        }
    }
}
