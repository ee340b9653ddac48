use serde::{Deserialize, Serialize};
use std::fmt;

/// Job definition submitted to the remote scheduler. Run type is always
/// on-demand so the job never fires on its own cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub name: String,
    pub script: String,
    pub active: bool,
    pub run_type: String,
    /// Optional impersonation target for the remote execution context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as: Option<String>,
}

impl NewJob {
    pub fn on_demand(name: String, script: String) -> Self {
        Self {
            name,
            script,
            active: true,
            run_type: "on_demand".to_string(),
            run_as: None,
        }
    }
}

/// Store-assigned reference to a created job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobRef(pub String);

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run-once trigger asking the scheduler to pick a job up at a
/// near-future timestamp instead of waiting for its normal cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrigger {
    pub name: String,
    pub job_id: JobRef,
    /// Scheduled fire time, store-local format "YYYY-MM-DD HH:MM:SS".
    pub next_action: String,
    /// 0 = run once.
    pub trigger_type: u8,
}

impl NewTrigger {
    /// Trigger for `job` firing `lead` from now.
    pub fn run_once(name: String, job: JobRef, lead: chrono::Duration) -> Self {
        let fire_at = chrono::Utc::now() + lead;
        Self {
            name,
            job_id: job,
            next_action: fire_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            trigger_type: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TriggerRef(pub String);

impl fmt::Display for TriggerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduler-owned trigger state. The remote platform advances this
/// asynchronously; 2 and 3 are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    Ready,
    Queued,
    Executed,
    Error,
}

impl TriggerState {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => TriggerState::Queued,
            2 => TriggerState::Executed,
            3 => TriggerState::Error,
            _ => TriggerState::Ready,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TriggerState::Executed | TriggerState::Error)
    }
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerState::Ready => write!(f, "ready"),
            TriggerState::Queued => write!(f, "queued"),
            TriggerState::Executed => write!(f, "executed"),
            TriggerState::Error => write!(f, "error"),
        }
    }
}

/// Generic string-valued property row, id retained for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProperty {
    pub id: PropertyRef,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PropertyRef(pub String);

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a captured output line, in the remote runtime's four
/// emission channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputLevel {
    Print,
    Info,
    Warn,
    Error,
}

impl fmt::Display for OutputLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputLevel::Print => write!(f, "print"),
            OutputLevel::Info => write!(f, "info"),
            OutputLevel::Warn => write!(f, "warn"),
            OutputLevel::Error => write!(f, "error"),
        }
    }
}

/// One log line captured by the wrapper, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedLine {
    pub level: OutputLevel,
    pub message: String,
    pub timestamp: String,
}

/// The full result record the instrumented script writes under the
/// result-marker key. Field names match the wrapper's serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub execution_id: String,
    pub success: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub output: Vec<CapturedLine>,
    pub execution_time_ms: u64,
    pub completed_at: String,
}
