//! Plain-text renderers for the console.
//!
//! Provides the decision panel for the requester perspective and the
//! transparency dashboard for the subject perspective.

use crate::audit::{AuditLogStore, AuditSnapshot};
use crate::models::audit::{AuditAction, AuditLogEntry};
use crate::models::decision::{Decision, DecisionOutcome, RationaleSource};
use crate::request::RequestBuilder;

/// Shown before the first submission.
pub const NOT_EVALUATED_TEXT: &str = "No request evaluated yet.";

/// Shown when the log loaded successfully but holds no entries.
pub const EMPTY_HISTORY_TEXT: &str = "No access history recorded for this record.";

/// Shown before the first refresh.
pub const NOT_LOADED_TEXT: &str = "Access history not loaded yet.";

/// Heads the fallback entry when the last refresh failed.
pub const UNAVAILABLE_HISTORY_TEXT: &str = "Access history unavailable: the last refresh failed.";

/// Format of the refresh time under the dashboard.
pub const REFRESHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Badge prefix for a decision.
#[must_use]
pub fn decision_badge(decision: Decision) -> &'static str {
    match decision {
        Decision::Pending => "\u{23f3} PENDING",
        Decision::Allow => "\u{2705} ALLOW",
        Decision::Restrict => "\u{26a0}\u{fe0f} RESTRICT",
        Decision::Deny => "\u{274c} DENY",
    }
}

/// Render the decision panel.
#[must_use]
pub fn outcome(outcome: Option<&DecisionOutcome>) -> String {
    let Some(outcome) = outcome else {
        return NOT_EVALUATED_TEXT.to_owned();
    };

    let attribution = match outcome.source {
        RationaleSource::Placeholder => "console",
        RationaleSource::PolicyService => "policy decision service",
        RationaleSource::ConnectivityFailure => "console (connectivity failure)",
    };

    format!(
        "Decision: {}\nRationale ({attribution}): {}",
        decision_badge(outcome.decision),
        outcome.rationale
    )
}

/// Render the current request form.
#[must_use]
pub fn form(builder: &RequestBuilder) -> String {
    let emergency = if builder.emergency_override() { "yes" } else { "no" };
    let mut out = format!(
        "Role:       {}\nLocation:   {}\nTime:       {}\nPurpose:    {}\nEmergency:  {emergency}",
        builder.role(),
        builder.location_label(),
        builder.time_of_day(),
        builder.purpose(),
    );
    if builder.emergency_override() {
        out.push_str("\nJustify:    ");
        out.push_str(builder.justification());
    }
    if let Some(reason) = builder.blocking_reason() {
        out.push_str("\nSubmit disabled: ");
        out.push_str(reason);
    }
    out
}

fn action_marker(action: AuditAction) -> &'static str {
    match action {
        AuditAction::Accessed => "\u{2705} ACCESSED",
        AuditAction::Attempted => "\u{274c} ATTEMPTED",
        AuditAction::Restricted => "\u{26a0}\u{fe0f} RESTRICTED",
    }
}

/// Render one access-log entry.
#[must_use]
pub fn audit_entry(entry: &AuditLogEntry) -> String {
    let mut out = format!(
        "{} | {} | {} ({}) | {}",
        action_marker(entry.action),
        entry.timestamp,
        entry.who,
        entry.role,
        entry.resource
    );
    if !entry.context.is_empty() {
        out.push_str("\n    context: ");
        out.push_str(&entry.context);
    }
    if !entry.decision_reason.is_empty() {
        out.push_str("\n    reason:  ");
        out.push_str(&entry.decision_reason);
    }
    out
}

/// Render the transparency dashboard.
///
/// A failed fetch and an empty history render differently: the former
/// shows the fallback entry under an "unavailable" header, the latter an
/// explicit empty-state message. Refusal counts only cover entries the
/// service actually returned.
#[must_use]
pub fn audit_log(store: &AuditLogStore) -> String {
    let body = match store.snapshot() {
        AuditSnapshot::NotLoaded => return NOT_LOADED_TEXT.to_owned(),
        AuditSnapshot::Loaded(entries) if entries.is_empty() => EMPTY_HISTORY_TEXT.to_owned(),
        AuditSnapshot::Loaded(entries) => {
            let refusals = entries.iter().filter(|e| e.action.is_refusal()).count();
            let mut out = format!(
                "Access history: {} entr{} ({refusals} denied or restricted)",
                entries.len(),
                if entries.len() == 1 { "y" } else { "ies" }
            );
            for entry in entries {
                out.push('\n');
                out.push_str(&audit_entry(entry));
            }
            out
        }
        AuditSnapshot::Unavailable(fallback) => {
            format!("{UNAVAILABLE_HISTORY_TEXT}\n{}", audit_entry(fallback))
        }
    };

    match store.refreshed_at() {
        Some(at) => format!("{body}\nRefreshed: {}", at.format(REFRESHED_AT_FORMAT)),
        None => body,
    }
}
