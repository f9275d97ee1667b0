//! Configuration loading (figment multi-source merge).

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChamberConfig, FileConfig, FileLoggingConfig, FileTemplatesConfig,
};
pub use loader::ConfigLoader;
