//! Log formatting options for different output styles

use chrono::{DateTime, Utc};

/// A log line ready to be formatted
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn from_log_record(record: &log::Record) -> Self {
        Self {
            timestamp: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

/// How logs should be formatted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Example: {"timestamp":"2025-01-15T10:30:00Z","level":"INFO","target":"vacina_core::controller::list","message":"..."}
    Json,

    /// Example: 2025-01-15 10:30:00.000 INFO  [vacina_core::controller::list] ...
    Human,
}

impl LogFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "human" => Some(LogFormat::Human),
            _ => None,
        }
    }

    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
        }
    }
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();
    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), entry.level.as_str().into());
    json.insert("target".to_string(), entry.target.clone().into());
    json.insert("message".to_string(), entry.message.clone().into());

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{} {:5} [{}] {}", timestamp, entry.level.as_str(), entry.target, entry.message)
}
