pub mod bridge;
pub mod outcome;
pub mod trace;
pub mod trigger;

pub use bridge::{ExecutionBridge, ExecutionRequest};
pub use outcome::{ExecutionOutcome, OutputBuckets, TriggerOutcome};
pub use trace::{start_trace_session, TraceSession, TraceSessionOptions};
pub use trigger::DirectTrigger;
