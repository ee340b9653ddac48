pub mod config;
pub mod error;
pub mod id;
pub mod record;
pub mod store;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use id::ExecutionId;
pub use record::{
    CapturedLine, ExecutionReport, JobRef, NewJob, NewTrigger, OutputLevel, PropertyRef,
    StoredProperty, TriggerRef, TriggerState,
};
pub use store::JobStore;
