//! Transition engine: decides create/update/no-op per health report and
//! synchronizes the outcome to the remote API, tracker, and store

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::api::{IncidentBody, IncidentPayload, StatusPageClient};
use crate::config::Config;
use crate::incident::{Incident, LifecycleStatus};
use crate::narrative::{creation_narrative, transition_narrative, Narrative};
use crate::report::HealthReport;
use crate::severity::{component_status, impact, severity, Impact, Severity};
use crate::store::IncidentStore;
use crate::tracker::{IncidentPhase, IncidentTracker, TrackerHandle};

/// How long a new incident window is scheduled to stay open
const SCHEDULED_WINDOW_DAYS: i64 = 4;

/// Decision for a single health report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Create,
    Update { id: String, narrative: Narrative },
}

/// Decide what to do for a report given the current tracker state.
///
/// A tracked incident with unchanged severity is a no-op, as is a healthy
/// report for an untracked service. A severity change on a tracked incident
/// becomes an update only when a transition narrative exists for the pair;
/// pairs without one (e.g. escalation out of degraded performance) are
/// skipped rather than dispatched with an empty body.
pub fn decide(tracker: &IncidentTracker, report: &HealthReport) -> Action {
    let current = severity(report.status);

    match tracker.get(&report.name) {
        Some(tracked) => {
            let previous = tracked.incident.severity;
            if previous == current {
                return Action::None;
            }

            let Some(narrative) = transition_narrative(previous, current, &report.display_name)
            else {
                tracing::debug!(
                    "No narrative for '{}' severity {} -> {}, skipping update",
                    report.name,
                    previous.rank(),
                    current.rank()
                );
                return Action::None;
            };

            let Some(id) = tracked.incident.id.clone() else {
                tracing::warn!(
                    "Tracked incident for '{}' has no id, cannot update",
                    report.name
                );
                return Action::None;
            };

            Action::Update { id, narrative }
        }
        None => {
            if current == Severity::Operational {
                Action::None
            } else {
                Action::Create
            }
        }
    }
}

/// The engine owns the collaborator handles and applies decisions
pub struct Engine {
    config: Config,
    client: StatusPageClient,
    store: Arc<dyn IncidentStore>,
    tracker: TrackerHandle,
}

impl Engine {
    pub fn new(
        config: Config,
        client: StatusPageClient,
        store: Arc<dyn IncidentStore>,
        tracker: TrackerHandle,
    ) -> Self {
        Self {
            config,
            client,
            store,
            tracker,
        }
    }

    /// Rehydrate the tracker from the store's active incidents. Must complete
    /// before the first report is processed.
    pub async fn load_active(&self) -> crate::Result<()> {
        self.store.init().await?;
        let records = self.store.active_incidents().await?;
        let count = records.len();

        let mut tracker = self.tracker.write().await;
        tracker.load_active(records);
        tracing::info!(
            "Loaded {} of {} persisted incidents",
            tracker.len(),
            count
        );
        Ok(())
    }

    /// Process one health report. Fire-and-forget: every failure is terminal
    /// for this cycle and surfaced via logging only.
    pub async fn process_report(&self, report: &HealthReport) {
        let action = {
            let tracker = self.tracker.read().await;
            decide(&tracker, report)
        };

        tracing::debug!("Report for '{}' ({}): {:?}", report.name, report.status, action);

        match action {
            Action::None => {}
            Action::Create => self.dispatch_create(report).await,
            Action::Update { id, narrative } => {
                self.dispatch_update(report, &id, narrative).await;
            }
        }
    }

    async fn dispatch_create(&self, report: &HealthReport) {
        let now = Utc::now();
        let body = creation_narrative(
            &report.display_name,
            report.status,
            report.error_text(),
            &self.config.footer_message,
        );
        let incident = self.build_incident(report, LifecycleStatus::InProgress, body, now);
        let payload = create_payload(report, &incident);

        match self.client.create_incident(&payload).await {
            Ok(id) => {
                tracing::info!("Incident for '{}' created as {}", report.name, id);
                let mut incident = incident;
                incident.id = Some(id);
                self.commit(incident).await;
            }
            Err(e) => {
                tracing::warn!("Incident creation for '{}' failed: {}", report.name, e);
            }
        }
    }

    async fn dispatch_update(&self, report: &HealthReport, id: &str, narrative: Narrative) {
        let now = Utc::now();
        let incident =
            self.build_incident(report, narrative.status, narrative.body, now);
        let payload = update_payload(report, &incident, id);

        match self.client.update_incident(id, &payload).await {
            Ok(id) => {
                tracing::info!("Incident for '{}' updated as {}", report.name, id);
                let mut incident = incident;
                incident.id = Some(id);
                self.commit(incident).await;
            }
            Err(e) => {
                tracing::warn!("Incident update for '{}' failed: {}", report.name, e);
            }
        }
    }

    /// Write the accepted incident back into the tracker and mirror it to
    /// the store. A store failure does not unwind the tracker write.
    async fn commit(&self, incident: Incident) {
        let phase = if incident.severity == Severity::Operational {
            IncidentPhase::Resolved
        } else {
            IncidentPhase::Open
        };

        {
            let mut tracker = self.tracker.write().await;
            tracker.insert(incident.clone(), phase);
        }

        if let Err(e) = self.store.add_incident(&incident).await {
            tracing::warn!(
                "Persisting incident for '{}' failed: {}",
                incident.service_name,
                e
            );
        }
    }

    fn build_incident(
        &self,
        report: &HealthReport,
        status: LifecycleStatus,
        body: String,
        now: DateTime<Utc>,
    ) -> Incident {
        let mut components = HashMap::new();
        match self.config.component_id(&report.name) {
            Some(component_id) => {
                components.insert(component_id.to_string(), component_status(report.status));
            }
            None => {
                tracing::warn!("No component configured for service '{}'", report.name);
            }
        }

        Incident {
            id: None,
            service_name: report.name.clone(),
            severity: severity(report.status),
            status,
            body,
            components,
            scheduled_for: now,
            scheduled_until: now + Duration::days(SCHEDULED_WINDOW_DAYS),
            deliver_notifications: impact(report.status) == Impact::Critical,
            auto_transition_to_maintenance_state: false,
            auto_transition_to_operational_state: false,
        }
    }
}

fn incident_name(report: &HealthReport) -> String {
    format!("{} incident, {}", report.display_name, report.error_text())
}

fn create_payload(report: &HealthReport, incident: &Incident) -> IncidentPayload {
    IncidentPayload {
        id: None,
        severity: incident.severity,
        incident: IncidentBody {
            name: incident_name(report),
            status: incident.status,
            impact_override: Some(impact(report.status)),
            body: incident.body.clone(),
            components: incident.components.clone(),
            component_ids: Some(incident.components.keys().cloned().collect()),
            severity: None,
            scheduled_for: incident.scheduled_for,
            scheduled_until: incident.scheduled_until,
            deliver_notifications: incident.deliver_notifications,
            auto_transition_to_maintenance_state: false,
            auto_transition_to_operational_state: false,
        },
    }
}

fn update_payload(report: &HealthReport, incident: &Incident, id: &str) -> IncidentPayload {
    IncidentPayload {
        id: Some(id.to_string()),
        severity: incident.severity,
        incident: IncidentBody {
            name: incident_name(report),
            status: incident.status,
            impact_override: None,
            body: incident.body.clone(),
            components: incident.components.clone(),
            component_ids: None,
            severity: Some(incident.severity),
            scheduled_for: incident.scheduled_for,
            scheduled_until: incident.scheduled_until,
            deliver_notifications: incident.deliver_notifications,
            auto_transition_to_maintenance_state: false,
            auto_transition_to_operational_state: false,
        },
    }
}
