//! Contract with the external policy decision service.
//!
//! The [`PolicyService`] trait is the only system boundary the console
//! depends on. [`HttpPolicyService`] talks to the real service; tests
//! substitute scripted implementations.

pub mod http;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::models::audit::AuditLogEntry;
use crate::models::decision::Decision;
use crate::models::request::AccessRequest;
use crate::Result;

/// Raw success payload of the evaluate-access call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Decision string, expected to be `ALLOW`, `RESTRICT` or `DENY`.
    pub decision: String,
    /// Rationale text produced by the service.
    pub log: String,
}

impl EvaluationResponse {
    /// Validate the decision against the known set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnrecognizedDecision` for any other value.
    pub fn into_decision(self) -> Result<(Decision, String)> {
        let decision = self.decision.parse::<Decision>()?;
        Ok((decision, self.log))
    }
}

/// Interface to the policy decision collaborator.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
pub trait PolicyService: Send + Sync {
    /// Evaluate an access request.
    ///
    /// # Errors
    ///
    /// Returns a communication error on transport failure, non-success
    /// status, or an undecodable body.
    fn evaluate<'a>(
        &'a self,
        request: &'a AccessRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EvaluationResponse>> + Send + 'a>>;

    /// Fetch the current access-log snapshot, in service order.
    ///
    /// # Errors
    ///
    /// Returns a communication error on transport or decode failure.
    fn fetch_audit_log(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AuditLogEntry>>> + Send + '_>>;
}

pub use self::http::HttpPolicyService;
