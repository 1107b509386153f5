//! Intake registry: every visitor's flow, keyed by id, plus the pending
//! submissions so they can be cancelled on reset or teardown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::flow::LeadIntakeFlow;
use super::model::{ContactDetails, PropertyType, Timeline};
use super::state::IntakeStep;
use super::submit::{LeadSubmitter, SubmissionHandle};
use crate::error::IntakeError;

type Flows = Arc<RwLock<HashMap<Uuid, LeadIntakeFlow>>>;

pub struct IntakeRegistry {
    flows: Flows,
    pending: Arc<RwLock<HashMap<Uuid, AbortHandle>>>,
    submitter: Arc<dyn LeadSubmitter>,
}

impl IntakeRegistry {
    pub fn new(submitter: Arc<dyn LeadSubmitter>) -> Arc<Self> {
        Arc::new(Self {
            flows: Arc::new(RwLock::new(HashMap::new())),
            pending: Arc::new(RwLock::new(HashMap::new())),
            submitter,
        })
    }

    /// Start a new flow at step 1.
    pub async fn start(&self) -> LeadIntakeFlow {
        let flow = LeadIntakeFlow::new();
        debug!(lead_id = %flow.id, "Intake flow started");
        self.flows.write().await.insert(flow.id, flow.clone());
        flow
    }

    /// Snapshot of a flow.
    pub async fn get(&self, id: Uuid) -> Option<LeadIntakeFlow> {
        self.flows.read().await.get(&id).cloned()
    }

    pub async fn submit_address(&self, id: Uuid, address: &str) -> Result<LeadIntakeFlow, IntakeError> {
        self.update(id, |flow| flow.submit_address(address).map(|_| ()))
            .await
    }

    pub async fn set_property_type(
        &self,
        id: Uuid,
        property_type: PropertyType,
    ) -> Result<LeadIntakeFlow, IntakeError> {
        self.update(id, |flow| flow.set_property_type(property_type))
            .await
    }

    pub async fn select_timeline(&self, id: Uuid, timeline: Timeline) -> Result<LeadIntakeFlow, IntakeError> {
        self.update(id, |flow| flow.select_timeline(timeline).map(|_| ()))
            .await
    }

    /// Validate the contact step, move to `submitting`, and run the
    /// submitter in the background. The flow moves to `success` when the
    /// submitter returns.
    pub async fn submit(&self, id: Uuid, contact: &ContactDetails) -> Result<SubmissionHandle, IntakeError> {
        let record = {
            let mut flows = self.flows.write().await;
            let flow = flows.get_mut(&id).ok_or(IntakeError::NotFound(id))?;
            flow.begin_submission(contact)?
        };

        info!(lead_id = %id, "Lead submitted");

        let flows = Arc::clone(&self.flows);
        let pending = Arc::clone(&self.pending);
        let submitter = Arc::clone(&self.submitter);

        // Hold the pending lock across spawn so the task can't remove its
        // entry before it is inserted.
        let mut pending_guard = self.pending.write().await;
        let task = tokio::spawn(async move {
            submitter.submit(id, &record).await;

            pending.write().await.remove(&id);
            let mut flows = flows.write().await;
            match flows.get_mut(&id).map(LeadIntakeFlow::complete_submission) {
                Some(Ok(_)) => info!(lead_id = %id, "Lead submission completed"),
                Some(Err(e)) => warn!(lead_id = %id, error = %e, "Submission finished on a changed flow"),
                None => debug!(lead_id = %id, "Submission finished after flow was removed"),
            }
        });
        pending_guard.insert(id, task.abort_handle());
        drop(pending_guard);

        Ok(SubmissionHandle::new(id, task))
    }

    /// Cancel any pending submission and return the flow to step 1.
    pub async fn reset(&self, id: Uuid) -> Result<LeadIntakeFlow, IntakeError> {
        self.cancel_pending(id).await;
        self.update(id, |flow| {
            flow.reset();
            Ok(())
        })
        .await
    }

    /// Drop a flow entirely, cancelling any pending submission.
    pub async fn remove(&self, id: Uuid) -> Option<LeadIntakeFlow> {
        self.cancel_pending(id).await;
        self.flows.write().await.remove(&id)
    }

    /// Whether a submission is in flight for `id`.
    pub async fn is_pending(&self, id: Uuid) -> bool {
        self.pending.read().await.contains_key(&id)
    }

    /// Drop flows nobody has touched for `max_idle`. Returns how many went.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };
        let stale: Vec<Uuid> = self
            .flows
            .read()
            .await
            .values()
            .filter(|flow| flow.updated_at <= cutoff)
            .map(|flow| flow.id)
            .collect();

        for id in &stale {
            self.remove(*id).await;
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "Pruned idle intake flows");
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.flows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flows.read().await.is_empty()
    }

    pub async fn step(&self, id: Uuid) -> Option<IntakeStep> {
        self.flows.read().await.get(&id).map(LeadIntakeFlow::step)
    }

    async fn cancel_pending(&self, id: Uuid) {
        if let Some(handle) = self.pending.write().await.remove(&id) {
            handle.abort();
            info!(lead_id = %id, "Pending submission cancelled");
        }
    }

    async fn update<F>(&self, id: Uuid, f: F) -> Result<LeadIntakeFlow, IntakeError>
    where
        F: FnOnce(&mut LeadIntakeFlow) -> Result<(), IntakeError>,
    {
        let mut flows = self.flows.write().await;
        let flow = flows.get_mut(&id).ok_or(IntakeError::NotFound(id))?;
        f(flow)?;
        Ok(flow.clone())
    }
}
