//! Lead submission: an async operation behind a trait so a real CRM
//! integration can replace the simulated one.

use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use super::model::LeadRecord;

/// Delivers a completed lead somewhere. There is no failure path.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, lead_id: Uuid, record: &LeadRecord);
}

/// Stand-in for a CRM webhook: waits to model network latency, then logs
/// what a real integration would have done. Nothing leaves the process.
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl LeadSubmitter for SimulatedSubmitter {
    async fn submit(&self, lead_id: Uuid, record: &LeadRecord) {
        tokio::time::sleep(self.delay).await;
        info!(
            lead_id = %lead_id,
            timeline = ?record.timeline,
            property_type = ?record.property_type,
            "Simulated lead submission: contact created, \"New Lead\" tag applied, SMS automation triggered"
        );
    }
}

/// Handle to an in-flight submission.
pub struct SubmissionHandle {
    pub lead_id: Uuid,
    task: JoinHandle<()>,
}

impl SubmissionHandle {
    pub(crate) fn new(lead_id: Uuid, task: JoinHandle<()>) -> Self {
        Self { lead_id, task }
    }

    /// Stop the submission. The flow stays in `submitting` until reset.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the submission. Returns `false` if it was cancelled.
    pub async fn wait(self) -> bool {
        self.task.await.is_ok()
    }
}
