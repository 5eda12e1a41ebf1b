pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{file_store::JsonFileStore, gemini::GeminiClient};
pub use app::settings::SettingsPanel;
pub use config::cli::LocalStorage;
pub use config::toml_config::{AiConfig, AppConfig};
pub use crate::core::{advisor::AdvisoryClient, backup::BackupManager};
pub use utils::error::{BackupError, DeskError, Result, ServiceError};
