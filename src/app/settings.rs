use crate::core::backup::BackupManager;
use crate::core::{CompanyField, CompanySettings, Storage, WorkshopStore};
use crate::utils::error::{DeskError, Result};

/// Business profile and data management actions.
pub struct SettingsPanel<'a, S: Storage, W: WorkshopStore> {
    backups: BackupManager<S>,
    store: &'a W,
}

impl<'a, S: Storage, W: WorkshopStore> SettingsPanel<'a, S, W> {
    pub fn new(backup_storage: S, store: &'a W) -> Self {
        Self {
            backups: BackupManager::new(backup_storage),
            store,
        }
    }

    pub async fn export_backup(&self) -> Result<String> {
        let state = self.store.load().await?;
        self.backups.save(&state.tickets).await
    }

    pub async fn import_backup(&self, path: &str) -> Result<usize> {
        self.backups.import(path, self.store).await
    }

    /// 無法復原，必須確認
    pub async fn clear_all(&self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(DeskError::Cancelled {
                message: "reset requires confirmation".to_string(),
            });
        }
        self.store.on_clear().await?;
        tracing::warn!("🗑️ All tickets and company settings were deleted");
        Ok(())
    }

    pub async fn company(&self) -> Result<CompanySettings> {
        Ok(self.store.load().await?.company)
    }

    pub async fn update_company_field(
        &self,
        field: CompanyField,
        value: &str,
    ) -> Result<CompanySettings> {
        let current = self.company().await?;
        let updated = field.apply(&current, value);
        self.store.on_update_company(updated.clone()).await?;
        tracing::info!("🏪 Company {:?} updated", field);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_store::JsonFileStore;
    use crate::config::cli::LocalStorage;
    use crate::core::Ticket;
    use crate::utils::error::BackupError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("taller.json"));
        store.add_ticket(Ticket::new("1", "A", "B")).await.unwrap();
        let panel = SettingsPanel::new(LocalStorage::new(temp_dir.path()), &store);

        assert!(matches!(
            panel.clear_all(false).await,
            Err(DeskError::Cancelled { .. })
        ));
        assert_eq!(store.load().await.unwrap().tickets.len(), 1);

        panel.clear_all(true).await.unwrap();
        assert!(store.load().await.unwrap().tickets.is_empty());
    }

    #[tokio::test]
    async fn test_update_company_field_by_field() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("taller.json"));
        let panel = SettingsPanel::new(LocalStorage::new(temp_dir.path()), &store);

        panel
            .update_company_field(CompanyField::Name, "CeluFix")
            .await
            .unwrap();
        panel
            .update_company_field(CompanyField::Address, "Av. Siempre Viva 742")
            .await
            .unwrap();

        let company = panel.company().await.unwrap();
        assert_eq!(company.name, "CeluFix");
        assert_eq!(company.address, "Av. Siempre Viva 742");
        assert_eq!(company.terms, CompanySettings::default().terms);
    }

    #[tokio::test]
    async fn test_bad_import_leaves_state_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("taller.json"));
        store.add_ticket(Ticket::new("1", "A", "B")).await.unwrap();
        let before = store.load().await.unwrap();

        std::fs::write(temp_dir.path().join("object.json"), r#"{"tickets": []}"#).unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "[{").unwrap();
        let panel = SettingsPanel::new(LocalStorage::new(temp_dir.path()), &store);

        assert!(matches!(
            panel.import_backup("object.json").await,
            Err(DeskError::BackupError(BackupError::Shape { .. }))
        ));
        assert!(matches!(
            panel.import_backup("broken.json").await,
            Err(DeskError::BackupError(BackupError::Parse(_)))
        ));
        assert_eq!(store.load().await.unwrap(), before);
    }
}
