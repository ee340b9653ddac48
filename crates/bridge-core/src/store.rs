use crate::error::BridgeError;
use crate::record::{JobRef, NewJob, NewTrigger, PropertyRef, StoredProperty, TriggerRef, TriggerState};

/// Seam to the remote platform's table API. Every backend implements
/// this; the engine only ever talks through it.
///
/// The store offers no transactions and no push notifications: creates
/// return references, reads are point-in-time, and a queued job starts
/// whenever the remote scheduler gets around to it.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    /// Create a job definition. Fatal to the submission if this fails.
    async fn create_job(&self, job: &NewJob) -> Result<JobRef, BridgeError>;

    /// Delete a job definition (post-completion cleanup).
    async fn delete_job(&self, job: &JobRef) -> Result<(), BridgeError>;

    /// Create a run-once trigger for a job.
    async fn create_trigger(&self, trigger: &NewTrigger) -> Result<TriggerRef, BridgeError>;

    /// Read a trigger's scheduler-owned state. Errors here include the
    /// record having been consumed and removed by the scheduler.
    async fn get_trigger_state(&self, trigger: &TriggerRef) -> Result<TriggerState, BridgeError>;

    /// Look up a property by key. `Ok(None)` means not present yet.
    async fn get_property(&self, key: &str) -> Result<Option<StoredProperty>, BridgeError>;

    /// Create or overwrite a property (last writer wins).
    async fn set_property(
        &self,
        key: &str,
        value: &str,
        description: &str,
    ) -> Result<(), BridgeError>;

    /// Delete a property row by its store-assigned id.
    async fn delete_property(&self, id: &PropertyRef) -> Result<(), BridgeError>;
}
