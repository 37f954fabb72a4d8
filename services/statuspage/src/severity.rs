//! Pure mapping from service status to severity and display labels

use serde::{Deserialize, Serialize};

use crate::report::ServiceStatus;

/// Escalation rank of a service condition. Total order: `Operational` is the
/// lowest rank and `Maintenance` the highest. Serialized as its integer rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Severity {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    Maintenance,
}

impl Severity {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity as u8
    }
}

impl From<u8> for Severity {
    fn from(rank: u8) -> Severity {
        match rank {
            0 => Severity::Operational,
            1 => Severity::DegradedPerformance,
            2 => Severity::PartialOutage,
            3 => Severity::MajorOutage,
            _ => Severity::Maintenance,
        }
    }
}

/// Human-facing lifecycle category shown as the incident impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Resolved,
    Minor,
    Major,
    Critical,
    Maintenance,
}

/// Status-page-facing operational label for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    UnderMaintenance,
}

/// Severity rank for a reported status
pub fn severity(status: ServiceStatus) -> Severity {
    match status {
        ServiceStatus::Ok => Severity::Operational,
        ServiceStatus::LowPerformance => Severity::DegradedPerformance,
        ServiceStatus::Warning => Severity::PartialOutage,
        ServiceStatus::Error => Severity::MajorOutage,
        ServiceStatus::Other => Severity::Maintenance,
    }
}

/// Impact label for a reported status
pub fn impact(status: ServiceStatus) -> Impact {
    match status {
        ServiceStatus::Ok => Impact::Resolved,
        ServiceStatus::Error => Impact::Critical,
        ServiceStatus::Warning => Impact::Major,
        ServiceStatus::LowPerformance => Impact::Minor,
        ServiceStatus::Other => Impact::Maintenance,
    }
}

/// Component display label for a reported status
pub fn component_status(status: ServiceStatus) -> ComponentStatus {
    match status {
        ServiceStatus::Ok => ComponentStatus::Operational,
        ServiceStatus::Error => ComponentStatus::MajorOutage,
        ServiceStatus::Warning => ComponentStatus::PartialOutage,
        ServiceStatus::LowPerformance => ComponentStatus::DegradedPerformance,
        ServiceStatus::Other => ComponentStatus::UnderMaintenance,
    }
}
