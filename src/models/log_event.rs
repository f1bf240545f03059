use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Row written to the log store. `metadata` is stored as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub message: String,
    pub level: LogLevel,
    pub date: String,
    pub time: String,
    pub metadata: Option<String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>, metadata: Option<JsonValue>) -> Self {
        Self::at(Utc::now(), level, message, metadata)
    }

    pub fn at(
        now: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        metadata: Option<JsonValue>,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            metadata: metadata.map(|m| m.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn splits_timestamp_into_date_and_time() {
        let now = Utc.with_ymd_and_hms(2025, 8, 18, 22, 50, 12).unwrap();
        let event = LogEvent::at(now, LogLevel::Warn, "slow upstream", Some(json!({"ms": 900})));

        assert_eq!(event.date, "2025-08-18");
        assert_eq!(event.time, "22:50:12");
        assert_eq!(event.metadata.as_deref(), Some(r#"{"ms":900}"#));

        let row = serde_json::to_value(&event).unwrap();
        assert_eq!(row["level"], "warn");
    }

    #[test]
    fn missing_metadata_serializes_as_null() {
        let event = LogEvent::new(LogLevel::Info, "hello", None);
        let row = serde_json::to_value(&event).unwrap();
        assert!(row["metadata"].is_null());
    }
}
