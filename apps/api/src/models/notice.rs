use serde::Serialize;

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Error,
    Warning,
    Info,
}

/// A non-fatal condition surfaced on the page instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// CSS class used by the page template.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Error => "notice-error",
            NoticeLevel::Warning => "notice-warning",
            NoticeLevel::Info => "notice-info",
        }
    }
}
