use crate::outcome::TriggerOutcome;
use bridge_core::error::BridgeError;
use bridge_core::record::{JobRef, NewTrigger, TriggerState};
use bridge_core::store::JobStore;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lighter sibling of the execution bridge: fires a trigger for a job
/// that already exists, optionally waiting for the trigger's own state
/// to reach a terminal value. No wrapper, no validator, no marker.
pub struct DirectTrigger<S> {
    store: S,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl<S: JobStore> DirectTrigger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            poll_interval: Duration::from_secs(3),
            wait_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Fire a run-once trigger for `job`. With `wait` set, poll the
    /// trigger's state field until it is executed, errored, missing,
    /// or the wait window closes.
    pub async fn trigger(
        &self,
        job: &JobRef,
        wait: bool,
    ) -> Result<TriggerOutcome, BridgeError> {
        let trigger = NewTrigger::run_once(
            format!("Direct Trigger {}", job),
            job.clone(),
            chrono::Duration::seconds(2),
        );
        let trigger_ref = self.store.create_trigger(&trigger).await?;
        info!("Created trigger {} for existing job {}", trigger_ref, job);

        if !wait {
            return Ok(TriggerOutcome {
                triggered: true,
                trigger_id: trigger_ref.0,
                executed: None,
                final_state: None,
                message: "Trigger created; job will run when the scheduler picks it up"
                    .to_string(),
            });
        }

        let started = Instant::now();
        while started.elapsed() < self.wait_timeout {
            tokio::time::sleep(self.poll_interval).await;
            match self.store.get_trigger_state(&trigger_ref).await {
                Ok(state) if state.is_terminal() => {
                    info!("Trigger {} reached terminal state {}", trigger_ref, state);
                    return Ok(TriggerOutcome {
                        triggered: true,
                        trigger_id: trigger_ref.0.clone(),
                        executed: Some(state == TriggerState::Executed),
                        final_state: Some(state),
                        message: format!("Trigger finished with state {}", state),
                    });
                }
                Ok(state) => {
                    debug!("Trigger {} still {}", trigger_ref, state);
                }
                Err(e) => {
                    // The scheduler may consume and remove the trigger
                    // record; a missing row is not an error, just the
                    // end of what we can observe.
                    warn!("Trigger {} no longer readable, stopping wait: {}", trigger_ref, e);
                    break;
                }
            }
        }

        Ok(TriggerOutcome {
            triggered: true,
            trigger_id: trigger_ref.0,
            executed: None,
            final_state: None,
            message: "Trigger created but its outcome could not be confirmed".to_string(),
        })
    }
}
