//! Remote incident API client

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::incident::LifecycleStatus;
use crate::io::HttpClient;
use crate::severity::{ComponentStatus, Impact, Severity};

/// Outgoing incident payload. The severity rank rides at the top level next
/// to the incident body, and updates additionally carry the incident id.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub severity: Severity,
    pub incident: IncidentBody,
}

/// The incident body of an outgoing payload.
///
/// Creates carry `impact_override` and `component_ids`; updates instead
/// repeat the severity inside the body. Optional fields are omitted from the
/// wire when unset.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentBody {
    pub name: String,
    pub status: LifecycleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_override: Option<Impact>,
    pub body: String,
    pub components: HashMap<String, ComponentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub scheduled_for: DateTime<Utc>,
    pub scheduled_until: DateTime<Utc>,
    pub deliver_notifications: bool,
    pub auto_transition_to_maintenance_state: bool,
    pub auto_transition_to_operational_state: bool,
}

/// Client for the remote incident API
pub struct StatusPageClient {
    url: String,
    page_id: String,
    api_key: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for StatusPageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPageClient")
            .field("url", &self.url)
            .field("page_id", &self.page_id)
            .finish()
    }
}

impl StatusPageClient {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        Self {
            url: config.url.clone(),
            page_id: config.page_id.clone(),
            api_key: config.api_key.clone(),
            http,
        }
    }

    /// Create a new incident, returning the server-assigned id
    pub async fn create_incident(&self, payload: &IncidentPayload) -> crate::Result<String> {
        let url = format!("{}/pages/{}/incidents", self.url, self.page_id);
        let auth = format!("OAuth {}", self.api_key);
        let body = serde_json::to_value(payload)?;

        tracing::debug!("Creating incident at {}", url);
        let response = self
            .http
            .post_json(&url, &[("Authorization", auth.as_str())], &body)
            .await?;
        self.incident_id(response)
    }

    /// Update an existing incident, returning its id as echoed by the server
    pub async fn update_incident(
        &self,
        id: &str,
        payload: &IncidentPayload,
    ) -> crate::Result<String> {
        let url = format!("{}/pages/{}/incidents/{}", self.url, self.page_id, id);
        let auth = format!("OAuth {}", self.api_key);
        let body = serde_json::to_value(payload)?;

        tracing::debug!("Updating incident {} at {}", id, url);
        let response = self
            .http
            .put_json(&url, &[("Authorization", auth.as_str())], &body)
            .await?;
        self.incident_id(response)
    }

    fn incident_id(&self, response: crate::io::HttpResponse) -> crate::Result<String> {
        if !(200..300).contains(&response.status) {
            return Err(crate::StatusPageError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let record: serde_json::Value = serde_json::from_str(&response.body)?;
        match record.get("id").and_then(|id| id.as_str()) {
            Some(id) => Ok(id.to_string()),
            None => Err(crate::StatusPageError::Api {
                status: response.status,
                body: "response body has no incident id".to_string(),
            }),
        }
    }
}
