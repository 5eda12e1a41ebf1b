use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 維修單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Received,
    Diagnosing,
    InProgress,
    WaitingParts,
    Ready,
    Delivered,
    Cancelled,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::Received,
        TicketStatus::Diagnosing,
        TicketStatus::InProgress,
        TicketStatus::WaitingParts,
        TicketStatus::Ready,
        TicketStatus::Delivered,
        TicketStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Received => "received",
            TicketStatus::Diagnosing => "diagnosing",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::WaitingParts => "waiting_parts",
            TicketStatus::Ready => "ready",
            TicketStatus::Delivered => "delivered",
            TicketStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "done" | "completed" => return Ok(TicketStatus::Ready),
            "pending" => return Ok(TicketStatus::Received),
            _ => {}
        }
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = TicketStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown status '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// A repair job, kept as the JSON object it was stored or imported as.
///
/// The object is the source of truth: backups written by other builds (or by
/// the original web app) survive an import/export cycle untouched, and the
/// typed accessors below read fields leniently instead of rejecting records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket {
    data: Value,
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            data: Value::Object(Map::new()),
        }
    }
}

impl From<Value> for Ticket {
    fn from(data: Value) -> Self {
        Self { data }
    }
}

impl Ticket {
    pub fn new(id: impl Into<String>, device_model: &str, issue_description: &str) -> Self {
        let mut ticket = Ticket::default();
        ticket.set("id", Value::String(id.into()));
        ticket.set("customerName", Value::String(String::new()));
        ticket.set("customerPhone", Value::String(String::new()));
        ticket.set("deviceModel", Value::String(device_model.to_string()));
        ticket.set("issueDescription", Value::String(issue_description.to_string()));
        ticket.set("status", Value::String(TicketStatus::Received.as_str().to_string()));
        ticket.set("priceQuote", Value::from(0));
        ticket.set("createdAt", Value::String(Utc::now().to_rfc3339()));
        ticket
    }

    pub fn as_value(&self) -> &Value {
        &self.data
    }

    pub fn into_value(self) -> Value {
        self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 非物件記錄會先換成空物件
    pub fn set(&mut self, key: &str, value: Value) {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Value::Object(fields) = &mut self.data {
            fields.insert(key.to_string(), value);
        }
    }

    fn text(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Ids may be strings or numbers depending on who wrote the record.
    pub fn id(&self) -> String {
        match self.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        }
    }

    pub fn customer_name(&self) -> &str {
        self.text("customerName")
    }

    pub fn customer_phone(&self) -> &str {
        self.text("customerPhone")
    }

    pub fn device_model(&self) -> &str {
        self.text("deviceModel")
    }

    pub fn issue_description(&self) -> &str {
        self.text("issueDescription")
    }

    pub fn notes(&self) -> Option<&str> {
        self.get("notes").and_then(Value::as_str)
    }

    /// Raw status text as stored, whatever vocabulary it uses.
    pub fn status_label(&self) -> &str {
        self.text("status")
    }

    pub fn status(&self) -> Option<TicketStatus> {
        self.status_label().parse().ok()
    }

    pub fn price_quote(&self) -> f64 {
        match self.get("priceQuote") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// RFC 3339 text or epoch milliseconds.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.get("createdAt")? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            Value::Number(n) => DateTime::<Utc>::from_timestamp_millis(n.as_i64()?),
            _ => None,
        }
    }

    pub fn set_customer(&mut self, name: &str, phone: &str) {
        self.set("customerName", Value::String(name.to_string()));
        self.set("customerPhone", Value::String(phone.to_string()));
    }

    pub fn set_price_quote(&mut self, price: f64) {
        self.set("priceQuote", Value::from(price));
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.set("notes", Value::String(notes.to_string()));
    }

    pub fn set_status(&mut self, status: TicketStatus) {
        self.set("status", Value::String(status.as_str().to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySettings {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub terms: String,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            name: "Mi Taller".to_string(),
            phone: String::new(),
            address: String::new(),
            terms: "Garantía de 30 días sobre la reparación realizada. Equipos no retirados en 90 días se consideran abandonados.".to_string(),
        }
    }
}

/// Editable fields of [`CompanySettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    Name,
    Phone,
    Address,
    Terms,
}

impl CompanyField {
    /// 回傳套用修改後的完整設定，原值不變
    pub fn apply(&self, settings: &CompanySettings, value: &str) -> CompanySettings {
        let mut updated = settings.clone();
        let value = value.to_string();
        match self {
            CompanyField::Name => updated.name = value,
            CompanyField::Phone => updated.phone = value,
            CompanyField::Address => updated.address = value,
            CompanyField::Terms => updated.terms = value,
        }
        updated
    }
}

impl FromStr for CompanyField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(CompanyField::Name),
            "phone" => Ok(CompanyField::Phone),
            "address" => Ok(CompanyField::Address),
            "terms" => Ok(CompanyField::Terms),
            other => Err(format!(
                "unknown company field '{}', expected one of: name, phone, address, terms",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub category: String,
    pub estimated_price: f64,
    pub estimated_time: String,
    pub suggested_actions: Vec<String>,
}

/// Ticket fields shared with the AI service for report summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub model: String,
    pub issue: String,
    pub status: String,
    pub price: f64,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            model: ticket.device_model().to_string(),
            issue: ticket.issue_description().to_string(),
            status: ticket.status_label().to_string(),
            price: ticket.price_quote(),
        }
    }
}

/// Everything the workshop keeps on disk. Tickets are newest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopState {
    pub company: CompanySettings,
    pub tickets: Vec<Ticket>,
}
