//! HTTP implementation of [`PolicyService`].

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use tracing::{debug, info};

use super::{EvaluationResponse, PolicyService};
use crate::config::ServiceConfig;
use crate::models::audit::AuditLogEntry;
use crate::models::request::AccessRequest;
use crate::{AppError, Result};

/// Policy decision service reached over JSON/HTTP.
pub struct HttpPolicyService {
    client: Client,
    evaluate_url: String,
    audit_log_url: String,
}

impl HttpPolicyService {
    /// Build a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;

        info!(
            evaluate_url = %config.evaluate_url(),
            audit_log_url = %config.audit_log_url(),
            "policy service client configured"
        );

        Ok(Self {
            client,
            evaluate_url: config.evaluate_url(),
            audit_log_url: config.audit_log_url(),
        })
    }
}

/// Reject any non-2xx status without inspecting the body.
fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::UnexpectedStatus(status.as_u16()))
    }
}

impl PolicyService for HttpPolicyService {
    fn evaluate<'a>(
        &'a self,
        request: &'a AccessRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EvaluationResponse>> + Send + 'a>> {
        Box::pin(async move {
            debug!(url = %self.evaluate_url, "posting access request");
            let response = self
                .client
                .post(&self.evaluate_url)
                .json(request)
                .send()
                .await?;
            let body = ensure_success(response)?
                .json::<EvaluationResponse>()
                .await
                .map_err(|err| AppError::MalformedResponse(err.to_string()))?;
            Ok(body)
        })
    }

    fn fetch_audit_log(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AuditLogEntry>>> + Send + '_>> {
        Box::pin(async move {
            debug!(url = %self.audit_log_url, "fetching audit log");
            let response = self.client.get(&self.audit_log_url).send().await?;
            let entries = ensure_success(response)?
                .json::<Vec<AuditLogEntry>>()
                .await
                .map_err(|err| AppError::MalformedResponse(err.to_string()))?;
            Ok(entries)
        })
    }
}
