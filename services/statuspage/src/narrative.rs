//! Incident body text and lifecycle labels

use crate::incident::LifecycleStatus;
use crate::report::ServiceStatus;
use crate::severity::Severity;

/// Body text and lifecycle label for an incident update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub body: String,
    pub status: LifecycleStatus,
}

/// Narrative for a severity transition on an already-tracked incident.
///
/// Returns `None` for severity pairs with no matching arm; the caller must
/// treat that as "do not update". The covered pairs are recovery to normal,
/// de-escalation out of an outage, escalation to a major outage, and entry
/// into maintenance.
pub fn transition_narrative(
    previous: Severity,
    current: Severity,
    display_name: &str,
) -> Option<Narrative> {
    if current == Severity::Operational && previous != Severity::Operational {
        return Some(Narrative {
            body: format!("The service \"{}\" is now back to normal.", display_name),
            status: LifecycleStatus::Completed,
        });
    }
    if current == Severity::DegradedPerformance && previous > Severity::DegradedPerformance {
        return Some(Narrative {
            body: format!(
                "The service \"{}\" seems to be recovering, but the performance is still degraded.",
                display_name
            ),
            status: LifecycleStatus::Verifying,
        });
    }
    // Rank 2 maps to impact "major", but the published wording for a
    // de-escalation to rank 2 says "minor issues". Kept verbatim.
    if current == Severity::PartialOutage && previous > Severity::DegradedPerformance {
        return Some(Narrative {
            body: format!(
                "The service \"{}\" is now experiencing minor issues.",
                display_name
            ),
            status: LifecycleStatus::Verifying,
        });
    }
    if current == Severity::MajorOutage && previous > Severity::DegradedPerformance {
        return Some(Narrative {
            body: format!(
                "The service \"{}\" is now experiencing major issues.",
                display_name
            ),
            status: LifecycleStatus::Verifying,
        });
    }
    if current == Severity::Maintenance && previous != Severity::Maintenance {
        return Some(Narrative {
            body: format!("The service \"{}\" is now under maintenance.", display_name),
            status: LifecycleStatus::InProgress,
        });
    }
    None
}

/// Body text for a newly created incident
pub fn creation_narrative(
    display_name: &str,
    status: ServiceStatus,
    error: &str,
    footer: &str,
) -> String {
    format!(
        "The service \"{}\" is currently experiencing issues.\nThe error reported is: {} and the status of the service is now {}{}",
        display_name, error, status, footer
    )
}
