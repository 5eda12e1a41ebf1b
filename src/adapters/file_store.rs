use crate::core::{CompanySettings, Ticket, TicketStatus, WorkshopState, WorkshopStore};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Keeps the whole workshop in one pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_state(&self) -> Result<WorkshopState> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No data file at {}, starting empty", self.path.display());
                Ok(WorkshopState::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 先寫暫存檔再改名，避免寫到一半的檔案
    async fn write_state(&self, state: &WorkshopState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        tracing::debug!(
            "Saved {} tickets to {}",
            state.tickets.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn update<F, T>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut WorkshopState) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state().await?;
        let out = mutate(&mut state)?;
        self.write_state(&state).await?;
        Ok(out)
    }
}

#[async_trait]
impl WorkshopStore for JsonFileStore {
    async fn load(&self) -> Result<WorkshopState> {
        self.read_state().await
    }

    async fn on_import(&self, records: Vec<Ticket>) -> Result<()> {
        self.update(move |state| {
            state.tickets = records;
            Ok(())
        })
        .await
    }

    async fn on_clear(&self) -> Result<()> {
        self.update(|state| {
            *state = WorkshopState::default();
            Ok(())
        })
        .await
    }

    async fn on_update_company(&self, settings: CompanySettings) -> Result<()> {
        self.update(move |state| {
            state.company = settings;
            Ok(())
        })
        .await
    }

    async fn add_ticket(&self, ticket: Ticket) -> Result<()> {
        self.update(move |state| {
            state.tickets.insert(0, ticket);
            Ok(())
        })
        .await
    }

    async fn set_status(&self, id: &str, status: TicketStatus) -> Result<Ticket> {
        self.update(|state| {
            let ticket = state
                .tickets
                .iter_mut()
                .find(|t| t.id() == id)
                .ok_or_else(|| DeskError::TicketNotFound { id: id.to_string() })?;
            ticket.set_status(status);
            Ok(ticket.clone())
        })
        .await
    }
}

/// Next numeric id after the highest numeric id in use.
pub fn next_ticket_id(tickets: &[Ticket]) -> String {
    let highest = tickets
        .iter()
        .filter_map(|t| t.id().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (highest + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("taller.json"));

        let state = store.load().await.unwrap();
        assert!(state.tickets.is_empty());
        assert_eq!(state.company, CompanySettings::default());
    }

    #[tokio::test]
    async fn test_add_prepends_and_status_updates() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("data/taller.json"));

        store.add_ticket(Ticket::new("1", "Moto E13", "Pin de carga")).await.unwrap();
        store.add_ticket(Ticket::new("2", "Redmi 12", "Cámara")).await.unwrap();

        let updated = store.set_status("1", TicketStatus::Ready).await.unwrap();
        assert_eq!(updated.status(), Some(TicketStatus::Ready));

        let state = store.load().await.unwrap();
        let ids: Vec<String> = state.tickets.iter().map(Ticket::id).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(state.tickets[1].status(), Some(TicketStatus::Ready));

        assert!(matches!(
            store.set_status("99", TicketStatus::Ready).await,
            Err(DeskError::TicketNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_import_keeps_company_and_clear_resets_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("taller.json"));

        let company = CompanySettings {
            name: "CeluFix".to_string(),
            ..CompanySettings::default()
        };
        store.on_update_company(company.clone()).await.unwrap();
        store.add_ticket(Ticket::new("1", "A", "B")).await.unwrap();

        let imported = vec![Ticket::new("10", "X", "Y"), Ticket::new("11", "Z", "W")];
        store.on_import(imported.clone()).await.unwrap();

        let state = store.load().await.unwrap();
        assert_eq!(state.tickets, imported);
        assert_eq!(state.company, company);

        store.on_clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), WorkshopState::default());
    }

    #[test]
    fn test_next_ticket_id() {
        assert_eq!(next_ticket_id(&[]), "1");
        let tickets = vec![
            Ticket::new("7", "A", "B"),
            Ticket::new("legacy-3", "A", "B"),
            Ticket::new("12", "A", "B"),
        ];
        assert_eq!(next_ticket_id(&tickets), "13");
    }
}
