use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Normal,
    Error,
}

/// One line in the operator's transaction console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub text: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl LogEvent {
    pub fn info(text: impl Into<String>) -> Self {
        Self::at_now(text.into(), LogLevel::Normal, None)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::at_now(text.into(), LogLevel::Error, None)
    }

    pub fn with_link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self::at_now(text.into(), LogLevel::Normal, Some(link.into()))
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    fn at_now(text: String, level: LogLevel, link: Option<String>) -> Self {
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            text,
            level,
            link,
        }
    }
}
