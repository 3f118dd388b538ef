//! User-facing notifications.
//!
//! The simulator raises a [`Notice`] wherever an interactive front end would
//! pop a toast. How (or whether) it is shown is the host's business.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Sink for notices.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Emits notices as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Default => info!(title = %notice.title, "{}", notice.description),
            Severity::Warning | Severity::Destructive => {
                warn!(title = %notice.title, severity = ?notice.severity, "{}", notice.description)
            }
        }
    }
}

/// Keeps every notice; handy in tests and for hosts that render later.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.title.as_str()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
