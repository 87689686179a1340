//! Perspective switch between the requester and the data subject.
//!
//! [`ViewController`] owns one instance of every component and decides
//! which of them is active. Entering the subject-transparency perspective
//! always refreshes the access log; leaving it changes nothing.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::info;

use crate::audit::AuditLogStore;
use crate::decision::{DecisionClient, SubmissionResult};
use crate::models::request::AccessRequest;
use crate::request::RequestBuilder;
use crate::service::PolicyService;
use crate::{AppError, Result};

/// Which side of the record the console is showing.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// Clinician building and submitting access requests. Initial state.
    #[default]
    Requester,
    /// Patient reviewing who accessed their record and why.
    #[value(name = "subject", alias = "transparency")]
    SubjectTransparency,
}

/// Top-level state machine for the console.
pub struct ViewController {
    perspective: Perspective,
    builder: RequestBuilder,
    decisions: Arc<DecisionClient>,
    audit_log: AuditLogStore,
}

impl ViewController {
    /// Start in the requester perspective with a fresh form.
    #[must_use]
    pub fn new(service: Arc<dyn PolicyService>) -> Self {
        Self {
            perspective: Perspective::Requester,
            builder: RequestBuilder::new(),
            decisions: Arc::new(DecisionClient::new(Arc::clone(&service))),
            audit_log: AuditLogStore::new(service),
        }
    }

    /// Active perspective.
    #[must_use]
    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    /// Switch perspective.
    ///
    /// Returns `true` if the switch refreshed the access log, which
    /// happens exactly when entering [`Perspective::SubjectTransparency`]
    /// from [`Perspective::Requester`].
    pub async fn switch_to(&mut self, target: Perspective) -> bool {
        if target == self.perspective {
            return false;
        }

        info!(from = ?self.perspective, to = ?target, "perspective switched");
        self.perspective = target;

        if target == Perspective::SubjectTransparency {
            self.audit_log.refresh().await;
            return true;
        }
        false
    }

    /// Request form.
    #[must_use]
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Mutable request form.
    pub fn builder_mut(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }

    /// Decision client holding the displayed outcome.
    #[must_use]
    pub fn decisions(&self) -> &DecisionClient {
        &self.decisions
    }

    /// Access-log store.
    #[must_use]
    pub fn audit_log(&self) -> &AuditLogStore {
        &self.audit_log
    }

    /// Build a request from the form and submit it, waiting for the answer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the form blocks submission or
    /// the requester perspective is not active. The policy service is
    /// not contacted in either case.
    pub async fn submit(&self) -> Result<SubmissionResult> {
        let request = self.submittable_request()?;
        Ok(self.decisions.submit(&request).await)
    }

    /// Build a request from the form and submit it in the background.
    ///
    /// The displayed outcome is pending when this returns; the answer
    /// arrives through [`DecisionClient::subscribe`].
    ///
    /// # Errors
    ///
    /// Same as [`ViewController::submit`].
    pub fn dispatch_submit(&self) -> Result<JoinHandle<SubmissionResult>> {
        let request = self.submittable_request()?;
        Ok(self.decisions.dispatch(request))
    }

    fn submittable_request(&self) -> Result<AccessRequest> {
        if self.perspective != Perspective::Requester {
            return Err(AppError::Validation(
                "requests can only be submitted from the requester perspective".into(),
            ));
        }
        self.builder.build()
    }

    /// Explicit user-triggered access-log refresh.
    pub async fn refresh_audit_log(&mut self) {
        self.audit_log.refresh().await;
    }
}
