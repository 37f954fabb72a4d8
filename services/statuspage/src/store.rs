//! Local persistence mirror of tracked incidents

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::incident::Incident;

/// A persisted incident row: service name plus the serialized incident
#[derive(Debug, Clone)]
pub struct StoredIncident {
    pub name: String,
    pub data: String,
}

/// Abstraction over the incident mirror for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait IncidentStore: Send + Sync {
    /// Prepare the store for use
    async fn init(&self) -> crate::Result<()>;

    /// All incidents currently mirrored as active
    async fn active_incidents(&self) -> crate::Result<Vec<StoredIncident>>;

    /// Mirror an accepted incident, replacing any previous row for its service
    async fn add_incident(&self, incident: &Incident) -> crate::Result<()>;
}

/// SQLite-backed incident mirror
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let connection = Connection::open(path)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> crate::Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| crate::StatusPageError::Store("connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl IncidentStore for SqliteStore {
    async fn init(&self) -> crate::Result<()> {
        let connection = self.lock()?;
        connection.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS incidents (
                service TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                updated_at_unix INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    async fn active_incidents(&self) -> crate::Result<Vec<StoredIncident>> {
        let connection = self.lock()?;
        let mut statement = connection
            .prepare("SELECT service, data FROM incidents WHERE active = 1 ORDER BY service")?;

        let rows = statement.query_map([], |row| {
            Ok(StoredIncident {
                name: row.get(0)?,
                data: row.get(1)?,
            })
        })?;

        let mut incidents = Vec::new();
        for row in rows {
            incidents.push(row?);
        }
        Ok(incidents)
    }

    async fn add_incident(&self, incident: &Incident) -> crate::Result<()> {
        let data = serde_json::to_string(incident)?;
        let connection = self.lock()?;
        connection.execute(
            "
            INSERT INTO incidents (service, data, active, updated_at_unix)
            VALUES (?1, ?2, 1, ?3)
            ON CONFLICT(service) DO UPDATE SET
                data = excluded.data,
                active = 1,
                updated_at_unix = excluded.updated_at_unix
            ",
            params![
                incident.service_name,
                data,
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::LifecycleStatus;
    use crate::severity::Severity;
    use chrono::Utc;
    use std::collections::HashMap;

    fn sample_incident(service_name: &str, severity: Severity) -> Incident {
        let now = Utc::now();
        Incident {
            id: Some("inc-1".to_string()),
            service_name: service_name.to_string(),
            severity,
            status: LifecycleStatus::InProgress,
            body: "body".to_string(),
            components: HashMap::new(),
            scheduled_for: now,
            scheduled_until: now + chrono::Duration::days(4),
            deliver_notifications: false,
            auto_transition_to_maintenance_state: false,
            auto_transition_to_operational_state: false,
        }
    }

    fn open_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("incidents.db")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn init_creates_empty_store() {
        let (_dir, store) = open_store();
        store.init().await.unwrap();
        assert!(store.active_incidents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_incident_is_listed_as_active() {
        let (_dir, store) = open_store();
        store.init().await.unwrap();

        store
            .add_incident(&sample_incident("db", Severity::MajorOutage))
            .await
            .unwrap();

        let active = store.active_incidents().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "db");

        let decoded: Incident = serde_json::from_str(&active[0].data).unwrap();
        assert_eq!(decoded.id, Some("inc-1".to_string()));
        assert_eq!(decoded.severity, Severity::MajorOutage);
    }

    #[tokio::test]
    async fn add_incident_upserts_by_service() {
        let (_dir, store) = open_store();
        store.init().await.unwrap();

        store
            .add_incident(&sample_incident("db", Severity::MajorOutage))
            .await
            .unwrap();
        store
            .add_incident(&sample_incident("db", Severity::Operational))
            .await
            .unwrap();

        let active = store.active_incidents().await.unwrap();
        assert_eq!(active.len(), 1);

        let decoded: Incident = serde_json::from_str(&active[0].data).unwrap();
        assert_eq!(decoded.severity, Severity::Operational);
    }

    #[tokio::test]
    async fn incidents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.init().await.unwrap();
            store
                .add_incident(&sample_incident("db", Severity::PartialOutage))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        store.init().await.unwrap();
        let active = store.active_incidents().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "db");
    }
}
