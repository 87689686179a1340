//! Decision client: pending-then-resolved lifecycle with fail-closed errors.
//!
//! Every submission immediately replaces the displayed outcome with a
//! pending placeholder, then settles exactly once. A settlement is only
//! applied if no newer submission has started since, so the display
//! follows the last submission made, not the last response received.
//! Any communication failure, including an unrecognized decision value,
//! settles as `deny` with a fixed connectivity rationale.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::decision::DecisionOutcome;
use crate::models::request::AccessRequest;
use crate::service::PolicyService;

/// Display state shared with subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Number of submissions started so far.
    pub generation: u64,
    /// Outcome of the latest submission, `None` before the first one.
    pub outcome: Option<DecisionOutcome>,
}

/// What a single `submit` call settled to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Correlation identifier logged for this submission.
    pub submission_id: Uuid,
    /// Outcome this submission settled to.
    pub outcome: DecisionOutcome,
    /// Whether the outcome reached the display or was discarded as stale.
    pub applied: bool,
}

/// Sends access requests and owns the displayed [`DecisionOutcome`].
pub struct DecisionClient {
    service: Arc<dyn PolicyService>,
    state: watch::Sender<DisplayState>,
}

impl DecisionClient {
    /// Create a client with no outcome displayed.
    #[must_use]
    pub fn new(service: Arc<dyn PolicyService>) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self { service, state }
    }

    /// Currently displayed outcome, `None` when nothing was evaluated yet.
    #[must_use]
    pub fn outcome(&self) -> Option<DecisionOutcome> {
        self.state.borrow().outcome.clone()
    }

    /// Number of submissions started.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Observe display state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// Submit a request and settle its outcome.
    ///
    /// The pending placeholder is shown before the service is called. Errors
    /// never escape; they settle as a fail-closed deny.
    pub async fn submit(&self, request: &AccessRequest) -> SubmissionResult {
        let generation = self.begin();
        self.resolve(generation, request).await
    }

    /// Submit a request without waiting for the answer.
    ///
    /// The pending placeholder is shown before this returns; the call to
    /// the policy service runs on a spawned task and settles through the
    /// same last-submission-wins rule as [`DecisionClient::submit`].
    pub fn dispatch(self: &Arc<Self>, request: AccessRequest) -> JoinHandle<SubmissionResult> {
        let generation = self.begin();
        let client = Arc::clone(self);
        tokio::spawn(async move { client.resolve(generation, &request).await })
    }

    /// Call the policy service and settle the given submission.
    async fn resolve(&self, generation: u64, request: &AccessRequest) -> SubmissionResult {
        let submission_id = Uuid::new_v4();
        let span = info_span!(
            "submit_access_request",
            %submission_id,
            generation,
            role = %request.role(),
            emergency = request.emergency_override(),
        );

        async move {
            let outcome = match self.service.evaluate(request).await {
                Ok(response) => match response.into_decision() {
                    Ok((decision, rationale)) => {
                        info!(%decision, "policy service answered");
                        DecisionOutcome::resolved(decision, rationale)
                    }
                    Err(err) => {
                        warn!(%err, "policy service answered with an unusable decision, failing closed");
                        DecisionOutcome::connectivity_failure()
                    }
                },
                Err(err) => {
                    warn!(%err, "policy service call failed, failing closed");
                    DecisionOutcome::connectivity_failure()
                }
            };

            let applied = self.settle(generation, &outcome);
            if !applied {
                debug!("superseded by a newer submission, outcome discarded");
            }

            SubmissionResult {
                submission_id,
                outcome,
                applied,
            }
        }
        .instrument(span)
        .await
    }

    /// Start a submission: bump the generation and show the placeholder.
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.outcome = Some(DecisionOutcome::pending());
            generation = state.generation;
        });
        generation
    }

    /// Apply `outcome` only if `generation` is still the latest submission.
    fn settle(&self, generation: u64, outcome: &DecisionOutcome) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation == generation {
                state.outcome = Some(outcome.clone());
                true
            } else {
                false
            }
        })
    }
}
