use thiserror::Error;

/// 備份檔讀取失敗的原因
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup content is not valid JSON: {0}")]
    Parse(String),

    #[error("Backup content is not a list of tickets (found {found})")]
    Shape { found: &'static str },
}

/// 外部 AI 服務呼叫失敗
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("AI service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI service returned no text")]
    EmptyResponse,

    #[error("AI service response could not be decoded: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// 是否可能為暫時性錯誤（目前不重試，只用於記錄）
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport(e) => e.is_timeout() || e.is_connect(),
            ServiceError::Status { status, .. } => {
                *status == 408 || *status == 429 || (500..600).contains(status)
            }
            ServiceError::EmptyResponse | ServiceError::Malformed(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Backup error: {0}")]
    BackupError(#[from] BackupError),

    #[error("AI service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Operation cancelled: {message}")]
    Cancelled { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Backup,
    Service,
    Storage,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeskError::BackupError(_) => ErrorCategory::Backup,
            DeskError::ServiceError(_) | DeskError::HttpError(_) => ErrorCategory::Service,
            DeskError::IoError(_) | DeskError::SerializationError(_) => ErrorCategory::Storage,
            DeskError::ConfigError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DeskError::ValidationError { .. }
            | DeskError::TicketNotFound { .. }
            | DeskError::Cancelled { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DeskError::Cancelled { .. } => ErrorSeverity::Low,
            DeskError::ServiceError(e) if e.is_transient() => ErrorSeverity::Medium,
            DeskError::HttpError(_) => ErrorSeverity::Medium,
            DeskError::BackupError(_)
            | DeskError::ServiceError(_)
            | DeskError::ValidationError { .. }
            | DeskError::TicketNotFound { .. } => ErrorSeverity::High,
            DeskError::IoError(_)
            | DeskError::SerializationError(_)
            | DeskError::ConfigError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeskError::BackupError(BackupError::Parse(_)) => {
                "Choose a backup file exported by repair-desk (JSON format)".to_string()
            }
            DeskError::BackupError(BackupError::Shape { .. }) => {
                "The backup must contain a JSON list of tickets".to_string()
            }
            DeskError::ServiceError(e) if e.is_transient() => {
                "The AI service is busy or unreachable, try again later".to_string()
            }
            DeskError::ServiceError(_) | DeskError::HttpError(_) => {
                "Check the API key and model name in the configuration".to_string()
            }
            DeskError::IoError(_) => "Check file permissions and available disk space".to_string(),
            DeskError::SerializationError(_) => {
                "The data file may be corrupted, restore it from a backup".to_string()
            }
            DeskError::ConfigError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::InvalidConfigValueError { .. } => {
                "Review repair-desk.toml or the command line flags".to_string()
            }
            DeskError::ValidationError { .. } => "Check the values passed to the command".to_string(),
            DeskError::TicketNotFound { .. } => {
                "Run `repair-desk ticket list` to see the existing ticket ids".to_string()
            }
            DeskError::Cancelled { .. } => "Pass --yes to confirm the operation".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeskError::BackupError(BackupError::Parse(_)) => {
                "Error al leer el archivo de respaldo.".to_string()
            }
            DeskError::BackupError(_) => "El archivo no tiene el formato correcto.".to_string(),
            DeskError::ServiceError(_) | DeskError::HttpError(_) => {
                format!("The AI service could not answer: {}", self)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
