//! Health report input types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw status of a monitored service as reported by a health check.
///
/// Unrecognized values deserialize to [`ServiceStatus::Other`] rather than
/// failing; anything a health check emits must map to some severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Ok,
    Error,
    Warning,
    LowPerformance,
    #[serde(other)]
    Other,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Ok => write!(f, "ok"),
            ServiceStatus::Error => write!(f, "error"),
            ServiceStatus::Warning => write!(f, "warning"),
            ServiceStatus::LowPerformance => write!(f, "low_performance"),
            ServiceStatus::Other => write!(f, "unknown"),
        }
    }
}

/// One health check result for a single service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub name: String,
    pub display_name: String,
    pub status: ServiceStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthReport {
    /// The reported error text, or a placeholder when the check gave none
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("none")
    }
}
