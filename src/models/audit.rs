//! Access-log entries shown on the transparency dashboard.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Role recorded on the synthetic fallback entry.
pub const FALLBACK_ROLE: &str = "N/A";

/// What happened to an access attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Record was accessed.
    #[serde(alias = "Accessed", alias = "ACCESSED")]
    Accessed,
    /// Access was attempted and denied.
    #[serde(alias = "Attempted", alias = "ATTEMPTED")]
    Attempted,
    /// Access was limited by policy.
    #[serde(alias = "Restricted", alias = "RESTRICTED")]
    Restricted,
}

impl AuditAction {
    /// Whether the entry represents denied or limited access.
    #[must_use]
    pub fn is_refusal(self) -> bool {
        !matches!(self, Self::Accessed)
    }
}

/// One historical access-log record, owned by the policy service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditLogEntry {
    /// Actor identity.
    pub who: String,
    /// Actor role at the time of access.
    pub role: String,
    /// Outcome classification.
    pub action: AuditAction,
    /// Accessed resource.
    pub resource: String,
    /// Timestamp as reported by the service.
    pub timestamp: String,
    /// Contextual attributes of the access.
    #[serde(default)]
    pub context: String,
    /// Why the service decided as it did.
    #[serde(default)]
    pub decision_reason: String,
}

impl AuditLogEntry {
    /// Synthetic entry substituted when the log cannot be fetched.
    #[must_use]
    pub fn fetch_failure(detail: &str) -> Self {
        Self {
            who: "System".to_owned(),
            role: FALLBACK_ROLE.to_owned(),
            action: AuditAction::Attempted,
            resource: "Audit Log".to_owned(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            context: "Transparency dashboard".to_owned(),
            decision_reason: format!("Unable to retrieve access history: {detail}"),
        }
    }
}
