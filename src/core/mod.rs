pub mod advisor;
pub mod backup;

pub use crate::domain::model::{
    AnalysisResult, CompanyField, CompanySettings, Ticket, TicketStatus, TicketSummary,
    WorkshopState,
};
pub use crate::domain::ports::{CompletionRequest, CompletionService, Storage, WorkshopStore};
pub use crate::utils::error::Result;
