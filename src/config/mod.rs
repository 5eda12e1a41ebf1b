pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{CompanyField, TicketStatus};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::AppConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "repair-desk")]
#[command(about = "Repair shop tickets, backups and AI-assisted triage")]
pub struct CliConfig {
    #[arg(long, global = true, default_value = "repair-desk.toml")]
    pub config: String,

    #[arg(long, global = true, help = "Workshop data file (overrides storage.data_file)")]
    pub data_file: Option<String>,

    #[arg(long, global = true, help = "Directory for exported backups")]
    pub backup_dir: Option<String>,

    #[arg(long, global = true, help = "API key for the AI service")]
    pub api_key: Option<String>,

    #[arg(long, global = true, help = "AI model identifier")]
    pub ai_model: Option<String>,

    #[arg(long, global = true, help = "Timeout for AI requests, in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create, list and update repair tickets
    Ticket {
        #[command(subcommand)]
        action: TicketCommand,
    },
    /// Export or restore the ticket collection
    Backup {
        #[command(subcommand)]
        action: BackupCommand,
    },
    /// Show or edit the company profile printed on tickets
    Company {
        #[command(subcommand)]
        action: CompanyCommand,
    },
    /// Delete every ticket and reset the company profile
    Reset {
        #[arg(long, help = "Confirm the reset, it cannot be undone")]
        yes: bool,
    },
    /// Ask the AI service to triage a device issue
    Analyze {
        #[arg(long)]
        model: String,
        #[arg(long)]
        issue: String,
    },
    /// Ask the AI service for an executive summary of recent tickets
    Report,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum TicketCommand {
    Add {
        #[arg(long)]
        model: String,
        #[arg(long)]
        issue: String,
        #[arg(long, default_value = "")]
        customer: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "0")]
        price: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    List,
    Status {
        id: String,
        status: TicketStatus,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum BackupCommand {
    Export,
    Import { file: String },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CompanyCommand {
    Show,
    Set { field: CompanyField, value: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔後套用命令列參數
    pub fn app_config(&self) -> Result<AppConfig> {
        let file_config = AppConfig::load_or_default(&self.config)?;
        Ok(self.apply_overrides(file_config))
    }

    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(backup_dir) = &self.backup_dir {
            config.storage.backup_dir = backup_dir.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.ai.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.ai_model {
            config.ai.model = model.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.ai.timeout_seconds = Some(timeout);
        }
        config
    }
}
