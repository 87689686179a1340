//! Decision outcome model for access evaluations.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Placeholder rationale shown while an evaluation is in flight.
pub const PENDING_RATIONALE: &str = "Evaluating access request...";

/// Rationale shown when no policy answer could be obtained.
///
/// Deliberately distinct from any rationale the policy service itself
/// produces so a refusal caused by connectivity can be told apart from
/// a policy-level denial.
pub const CONNECTIVITY_FAILURE_RATIONALE: &str =
    "Access denied: the policy decision service could not be reached or returned an unusable \
     response. Fail-closed policy applied; no policy evaluation took place.";

/// Lifecycle state of an access decision.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Submitted, awaiting the policy service.
    Pending,
    /// Full access granted.
    Allow,
    /// Limited access granted.
    Restrict,
    /// Access refused.
    Deny,
}

impl Decision {
    /// Whether the decision has settled.
    #[must_use]
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::Allow => f.write_str("ALLOW"),
            Self::Restrict => f.write_str("RESTRICT"),
            Self::Deny => f.write_str("DENY"),
        }
    }
}

impl FromStr for Decision {
    type Err = AppError;

    /// Parse a decision value received from the policy service.
    ///
    /// Only the three final values are accepted; `PENDING` is a local
    /// state and never a legal answer.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ALLOW" => Ok(Self::Allow),
            "RESTRICT" => Ok(Self::Restrict),
            "DENY" => Ok(Self::Deny),
            other => Err(AppError::UnrecognizedDecision(other.to_owned())),
        }
    }
}

/// Where a rationale came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleSource {
    /// Local placeholder while pending.
    Placeholder,
    /// Text produced by the policy decision service.
    PolicyService,
    /// Fixed local message after a communication failure.
    ConnectivityFailure,
}

/// Displayed result of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    /// Current decision state.
    pub decision: Decision,
    /// Human-readable explanation, opaque to the client.
    pub rationale: String,
    /// Origin of `rationale`.
    pub source: RationaleSource,
}

impl DecisionOutcome {
    /// Outcome at the moment of submission.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            decision: Decision::Pending,
            rationale: PENDING_RATIONALE.to_owned(),
            source: RationaleSource::Placeholder,
        }
    }

    /// Outcome taken verbatim from the policy service.
    #[must_use]
    pub fn resolved(decision: Decision, rationale: String) -> Self {
        Self {
            decision,
            rationale,
            source: RationaleSource::PolicyService,
        }
    }

    /// Fail-closed outcome after a communication failure.
    #[must_use]
    pub fn connectivity_failure() -> Self {
        Self {
            decision: Decision::Deny,
            rationale: CONNECTIVITY_FAILURE_RATIONALE.to_owned(),
            source: RationaleSource::ConnectivityFailure,
        }
    }

    /// Whether the outcome is still awaiting an answer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.decision == Decision::Pending
    }
}
