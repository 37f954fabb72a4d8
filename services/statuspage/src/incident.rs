//! Incident record owned by the tracker

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::{ComponentStatus, Severity};

/// Lifecycle label of an incident on the status page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    InProgress,
    Verifying,
    Completed,
}

/// The single incident tracked for a service.
///
/// `id` is assigned by the remote API on creation and carried through every
/// later update and restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub id: Option<String>,
    pub service_name: String,
    pub severity: Severity,
    pub status: LifecycleStatus,
    pub body: String,
    pub components: HashMap<String, ComponentStatus>,
    pub scheduled_for: DateTime<Utc>,
    pub scheduled_until: DateTime<Utc>,
    pub deliver_notifications: bool,
    pub auto_transition_to_maintenance_state: bool,
    pub auto_transition_to_operational_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_incident() -> Incident {
        let scheduled_for = "2026-03-01T10:00:00Z".parse().unwrap();
        let scheduled_until = "2026-03-05T10:00:00Z".parse().unwrap();
        Incident {
            id: Some("inc-1".to_string()),
            service_name: "db".to_string(),
            severity: Severity::MajorOutage,
            status: LifecycleStatus::InProgress,
            body: "down".to_string(),
            components: HashMap::from([("comp-1".to_string(), ComponentStatus::MajorOutage)]),
            scheduled_for,
            scheduled_until,
            deliver_notifications: true,
            auto_transition_to_maintenance_state: false,
            auto_transition_to_operational_state: false,
        }
    }

    #[test]
    fn round_trips_through_json() {
        let incident = sample_incident();
        let encoded = serde_json::to_string(&incident).unwrap();
        let decoded: Incident = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, Some("inc-1".to_string()));
        assert_eq!(decoded.severity, Severity::MajorOutage);
        assert_eq!(decoded.status, LifecycleStatus::InProgress);
        assert_eq!(decoded.scheduled_for, incident.scheduled_for);
        assert_eq!(
            decoded.components.get("comp-1"),
            Some(&ComponentStatus::MajorOutage)
        );
    }

    #[test]
    fn missing_id_decodes_to_none() {
        let mut value = serde_json::to_value(sample_incident()).unwrap();
        value.as_object_mut().unwrap().remove("id");
        let decoded: Incident = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.id, None);
    }

    #[test]
    fn lifecycle_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LifecycleStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
    }
}
