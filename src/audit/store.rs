//! Holds the latest access-log snapshot for the transparency dashboard.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn, Instrument};

use crate::models::audit::AuditLogEntry;
use crate::service::PolicyService;

/// Latest result of fetching the access log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuditSnapshot {
    /// No refresh has happened yet.
    #[default]
    NotLoaded,
    /// Entries exactly as received, possibly empty.
    Loaded(Vec<AuditLogEntry>),
    /// Fetch failed; holds the synthetic fallback entry.
    Unavailable(AuditLogEntry),
}

/// Read-only view over the collaborator's access log.
///
/// Entries are never sorted, deduplicated or edited; every refresh
/// fully replaces the previous snapshot.
pub struct AuditLogStore {
    service: Arc<dyn PolicyService>,
    snapshot: AuditSnapshot,
    refreshed_at: Option<DateTime<Utc>>,
}

impl AuditLogStore {
    /// Create an empty, not-yet-loaded store.
    #[must_use]
    pub fn new(service: Arc<dyn PolicyService>) -> Self {
        Self {
            service,
            snapshot: AuditSnapshot::NotLoaded,
            refreshed_at: None,
        }
    }

    /// Replace the held snapshot with the service's current log.
    ///
    /// On failure the snapshot becomes a single synthetic `attempted`
    /// entry describing the problem.
    pub async fn refresh(&mut self) {
        let span = info_span!("refresh_audit_log");
        let snapshot = async {
            match self.service.fetch_audit_log().await {
                Ok(entries) => {
                    info!(entries = entries.len(), "audit log refreshed");
                    AuditSnapshot::Loaded(entries)
                }
                Err(err) => {
                    warn!(%err, "audit log fetch failed, showing fallback entry");
                    AuditSnapshot::Unavailable(AuditLogEntry::fetch_failure(
                        "the access log service is unreachable",
                    ))
                }
            }
        }
        .instrument(span)
        .await;

        self.snapshot = snapshot;
        self.refreshed_at = Some(Utc::now());
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &AuditSnapshot {
        &self.snapshot
    }

    /// Entries to display, in received order.
    ///
    /// Yields the single fallback entry when the last fetch failed.
    #[must_use]
    pub fn entries(&self) -> &[AuditLogEntry] {
        match &self.snapshot {
            AuditSnapshot::NotLoaded => &[],
            AuditSnapshot::Loaded(entries) => entries,
            AuditSnapshot::Unavailable(fallback) => std::slice::from_ref(fallback),
        }
    }

    /// Whether the last refresh failed.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self.snapshot, AuditSnapshot::Unavailable(_))
    }

    /// Whether the last refresh succeeded with no history at all.
    #[must_use]
    pub fn is_empty_history(&self) -> bool {
        matches!(&self.snapshot, AuditSnapshot::Loaded(entries) if entries.is_empty())
    }

    /// When the last refresh completed.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
