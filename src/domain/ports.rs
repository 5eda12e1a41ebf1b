use crate::domain::model::{CompanySettings, Ticket, TicketStatus, WorkshopState};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One call to the text-generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    /// Declared output structure; `None` asks for free text.
    pub response_schema: Option<serde_json::Value>,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(&self, request: CompletionRequest) -> std::result::Result<String, ServiceError>;
}

/// State owner of the workshop. The `on_*` methods are the callbacks the
/// settings panel drives.
#[async_trait]
pub trait WorkshopStore: Send + Sync {
    async fn load(&self) -> Result<WorkshopState>;
    async fn on_import(&self, records: Vec<Ticket>) -> Result<()>;
    async fn on_clear(&self) -> Result<()>;
    async fn on_update_company(&self, settings: CompanySettings) -> Result<()>;
    async fn add_ticket(&self, ticket: Ticket) -> Result<()>;
    async fn set_status(&self, id: &str, status: TicketStatus) -> Result<Ticket>;
}
