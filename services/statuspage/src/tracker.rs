//! In-memory mapping of service name to its tracked incident

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::incident::Incident;
use crate::severity::Severity;
use crate::store::StoredIncident;

/// Whether the tracked incident is still open or has returned to normal.
///
/// Resolved incidents are retained, not evicted; a later report compares
/// against the retained severity and updates the same incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentPhase {
    Open,
    Resolved,
}

/// An incident together with its phase tag
#[derive(Debug, Clone)]
pub struct TrackedIncident {
    pub incident: Incident,
    pub phase: IncidentPhase,
}

/// Owned mapping of service name to its single tracked incident
#[derive(Debug, Default)]
pub struct IncidentTracker {
    incidents: HashMap<String, TrackedIncident>,
}

impl IncidentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, service_name: &str) -> Option<&TrackedIncident> {
        self.incidents.get(service_name)
    }

    /// Insert or replace the tracked incident for its service
    pub fn insert(&mut self, incident: Incident, phase: IncidentPhase) {
        self.incidents
            .insert(incident.service_name.clone(), TrackedIncident { incident, phase });
    }

    /// Rehydrate from persisted active incidents. Malformed records are
    /// skipped and logged; a bad row must not prevent startup.
    pub fn load_active(&mut self, records: Vec<StoredIncident>) {
        for record in records {
            match serde_json::from_str::<Incident>(&record.data) {
                Ok(incident) => {
                    let phase = if incident.severity == Severity::Operational {
                        IncidentPhase::Resolved
                    } else {
                        IncidentPhase::Open
                    };
                    tracing::debug!(
                        "Loaded incident for '{}' (severity {})",
                        record.name,
                        incident.severity.rank()
                    );
                    self.insert(incident, phase);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed persisted incident for '{}': {}",
                        record.name,
                        e
                    );
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

/// Thread-safe tracker handle shared between the engine and its caller
pub type TrackerHandle = Arc<RwLock<IncidentTracker>>;

pub fn new_tracker_handle() -> TrackerHandle {
    Arc::new(RwLock::new(IncidentTracker::new()))
}
