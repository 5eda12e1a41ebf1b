use crate::core::{Storage, Ticket, WorkshopStore};
use crate::utils::error::{BackupError, Result};
use chrono::{NaiveDate, Utc};
use serde_json::Value;

pub const BACKUP_FILE_PREFIX: &str = "respaldo_taller";
pub const BACKUP_FILE_EXTENSION: &str = "json";

/// `respaldo_taller_YYYY-MM-DD.json`
pub fn backup_filename(date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        BACKUP_FILE_PREFIX,
        date.format("%Y-%m-%d"),
        BACKUP_FILE_EXTENSION
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupFile {
    pub filename: String,
    pub contents: String,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 解析備份內容：只要求是 JSON 陣列，個別記錄原樣保留
pub fn parse_backup(text: &str) -> std::result::Result<Vec<Ticket>, BackupError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BackupError::Parse(e.to_string()))?;

    match value {
        Value::Array(items) => Ok(items.into_iter().map(Ticket::from).collect()),
        other => Err(BackupError::Shape {
            found: json_kind(&other),
        }),
    }
}

pub struct BackupManager<S: Storage> {
    storage: S,
}

impl<S: Storage> BackupManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn render(tickets: &[Ticket]) -> Result<String> {
        Ok(serde_json::to_string_pretty(tickets)?)
    }

    pub fn export(tickets: &[Ticket], date: NaiveDate) -> Result<BackupFile> {
        Ok(BackupFile {
            filename: backup_filename(date),
            contents: Self::render(tickets)?,
        })
    }

    /// Dated in UTC, like the backups of the original web app.
    pub fn export_today(tickets: &[Ticket]) -> Result<BackupFile> {
        Self::export(tickets, Utc::now().date_naive())
    }

    /// Writes today's backup through the storage backend and returns the file name.
    pub async fn save(&self, tickets: &[Ticket]) -> Result<String> {
        let backup = Self::export_today(tickets)?;
        tracing::debug!(
            "Writing backup {} ({} bytes, {} tickets)",
            backup.filename,
            backup.contents.len(),
            tickets.len()
        );
        self.storage
            .write_file(&backup.filename, backup.contents.as_bytes())
            .await?;
        tracing::info!("💾 Backup saved as {}", backup.filename);
        Ok(backup.filename)
    }

    /// Reads and validates a backup file without touching any state.
    pub async fn read(&self, path: &str) -> Result<Vec<Ticket>> {
        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| BackupError::Parse(format!("file is not UTF-8 text: {}", e)))?;
        let tickets = parse_backup(&text)?;
        tracing::debug!("Backup {} holds {} tickets", path, tickets.len());
        Ok(tickets)
    }

    /// Reads a backup and hands the records to the store. The store is only
    /// called when the whole file was accepted.
    pub async fn import<W: WorkshopStore + ?Sized>(&self, path: &str, store: &W) -> Result<usize> {
        let tickets = match self.read(path).await {
            Ok(tickets) => tickets,
            Err(e) => {
                tracing::warn!("⚠️ Backup {} rejected: {}", path, e);
                return Err(e);
            }
        };

        let count = tickets.len();
        store.on_import(tickets).await?;
        tracing::info!("📥 Imported {} tickets from {}", count, path);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketStatus;
    use crate::utils::error::DeskError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).await.ok_or_else(|| {
                DeskError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.put(path, data).await;
            Ok(())
        }
    }

    fn sample_tickets(count: usize) -> Vec<Ticket> {
        (0..count)
            .map(|i| {
                let mut ticket = Ticket::new(
                    (i + 1).to_string(),
                    &format!("Galaxy A{}", i),
                    "No enciende",
                );
                ticket.set_price_quote(25.5 * i as f64);
                ticket.set_status(TicketStatus::ALL[i % TicketStatus::ALL.len()]);
                ticket
            })
            .collect()
    }

    #[test]
    fn test_backup_filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(backup_filename(date), "respaldo_taller_2024-03-09.json");
    }

    #[test]
    fn test_render_is_pretty_and_ordered() {
        let tickets = sample_tickets(1);
        let text = BackupManager::<MockStorage>::render(&tickets).unwrap();

        assert!(text.starts_with("[\n"));
        let id_at = text.find("\"id\"").unwrap();
        let model_at = text.find("\"deviceModel\"").unwrap();
        let price_at = text.find("\"priceQuote\"").unwrap();
        assert!(id_at < model_at && model_at < price_at);
    }

    #[test]
    fn test_round_trip_sizes() {
        for count in [0, 1, 12] {
            let tickets = sample_tickets(count);
            let text = BackupManager::<MockStorage>::render(&tickets).unwrap();
            assert_eq!(parse_backup(&text).unwrap(), tickets);
        }
    }

    #[test]
    fn test_rejects_non_sequences() {
        for (payload, kind) in [
            (r#"{"id": "1"}"#, "object"),
            ("42", "number"),
            (r#""tickets""#, "string"),
            ("null", "null"),
        ] {
            match parse_backup(payload) {
                Err(BackupError::Shape { found }) => assert_eq!(found, kind),
                other => panic!("expected shape error for {}, got {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(parse_backup("[{\"id\": "), Err(BackupError::Parse(_))));
        assert!(matches!(parse_backup(""), Err(BackupError::Parse(_))));
    }

    #[test]
    fn test_accepts_any_array_elements() {
        let text = r#"[
            {"id": 17, "status": "in-progress", "customerName": null, "createdAt": 1715000000000},
            {"status": "done", "priceQuote": "35"},
            {},
            5,
            "suelto"
        ]"#;
        let tickets = parse_backup(text).unwrap();
        assert_eq!(tickets.len(), 5);

        assert_eq!(tickets[0].id(), "17");
        assert_eq!(tickets[0].status(), Some(TicketStatus::InProgress));
        assert_eq!(tickets[0].customer_name(), "");
        assert_eq!(tickets[0].created_at().unwrap().timestamp_millis(), 1715000000000);
        assert_eq!(tickets[1].status(), Some(TicketStatus::Ready));
        assert_eq!(tickets[1].price_quote(), 35.0);
        assert_eq!(tickets[3].as_value(), &serde_json::json!(5));
    }

    #[test]
    fn test_render_keeps_records_verbatim() {
        let text = r#"[{"notes":null,"id":17,"priceQuote":20,"createdAt":"2024-05-01T10:00:00.000Z","status":"en revisión"}]"#;
        let tickets = parse_backup(text).unwrap();
        let rendered = BackupManager::<MockStorage>::render(&tickets).unwrap();

        let before: Value = serde_json::from_str(text).unwrap();
        let after: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(after, before);
        assert!(rendered.contains("\"priceQuote\": 20,"));
        assert!(rendered.contains("2024-05-01T10:00:00.000Z"));
        // 欄位順序不變
        assert!(rendered.find("\"notes\"").unwrap() < rendered.find("\"id\"").unwrap());
    }

    #[tokio::test]
    async fn test_save_writes_dated_file() {
        let storage = MockStorage::new();
        let manager = BackupManager::new(storage.clone());
        let tickets = sample_tickets(3);

        let filename = manager.save(&tickets).await.unwrap();
        assert_eq!(filename, backup_filename(Utc::now().date_naive()));

        let written = storage.get_file(&filename).await.unwrap();
        let parsed = parse_backup(std::str::from_utf8(&written).unwrap()).unwrap();
        assert_eq!(parsed, tickets);
    }

    #[tokio::test]
    async fn test_read_rejects_binary_content() {
        let storage = MockStorage::new();
        storage.put("broken.json", &[0xff, 0xfe, 0x00]).await;
        let manager = BackupManager::new(storage);

        let result = manager.read("broken.json").await;
        assert!(matches!(
            result,
            Err(DeskError::BackupError(BackupError::Parse(_)))
        ));
    }
}
