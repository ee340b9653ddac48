use bridge_core::record::{CapturedLine, OutputLevel, TriggerState};
use bridge_script::RiskAnalysis;
use serde::Serialize;

/// Captured output partitioned by emission level. Relative order
/// within each bucket matches emission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputBuckets {
    pub print: Vec<CapturedLine>,
    pub info: Vec<CapturedLine>,
    pub warn: Vec<CapturedLine>,
    pub error: Vec<CapturedLine>,
}

impl OutputBuckets {
    pub fn partition(lines: &[CapturedLine]) -> Self {
        let mut buckets = Self::default();
        for line in lines {
            match line.level {
                OutputLevel::Print => buckets.print.push(line.clone()),
                OutputLevel::Info => buckets.info.push(line.clone()),
                OutputLevel::Warn => buckets.warn.push(line.clone()),
                OutputLevel::Error => buckets.error.push(line.clone()),
            }
        }
        buckets
    }

    pub fn total(&self) -> usize {
        self.print.len() + self.info.len() + self.warn.len() + self.error.len()
    }
}

/// Final answer from one bridge invocation. Exactly one of these comes
/// back for every accepted request; a timeout is the `Abandoned`
/// variant, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExecutionOutcome {
    /// The confirmation gate fired before any remote write.
    ConfirmationRequired {
        requires_confirmation: bool,
        confirmation_prompt: String,
        script_to_execute: String,
        next_step: String,
    },
    /// Marker observed and parsed; job and marker cleaned up.
    Completed {
        executed: bool,
        success: bool,
        result: Option<serde_json::Value>,
        error: Option<String>,
        output: OutputBuckets,
        execution_time_ms: u64,
        execution_id: String,
        security_analysis: RiskAnalysis,
        #[serde(skip_serializing_if = "Option::is_none")]
        warnings: Option<Vec<String>>,
    },
    /// Submission succeeded but completion was never confirmed. The
    /// job is left in the store for a manual run.
    Abandoned {
        executed: bool,
        execution_id: String,
        scheduled_job_id: String,
        message: String,
        action_required: String,
        manual_url: String,
    },
}

impl ExecutionOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { .. })
    }
}

/// Answer from the direct trigger path.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerOutcome {
    pub triggered: bool,
    pub trigger_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_state: Option<TriggerState>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(level: OutputLevel, message: &str) -> CapturedLine {
        CapturedLine {
            level,
            message: message.to_string(),
            timestamp: "t".to_string(),
        }
    }

    #[test]
    fn partition_buckets_by_level() {
        let lines = vec![
            line(OutputLevel::Print, "a"),
            line(OutputLevel::Warn, "b"),
            line(OutputLevel::Info, "c"),
            line(OutputLevel::Error, "d"),
            line(OutputLevel::Print, "e"),
        ];
        let buckets = OutputBuckets::partition(&lines);
        assert_eq!(buckets.total(), 5);
        assert_eq!(buckets.print.len(), 2);
        assert_eq!(buckets.print[0].message, "a");
        assert_eq!(buckets.print[1].message, "e");
        assert_eq!(buckets.warn[0].message, "b");
        assert_eq!(buckets.info[0].message, "c");
        assert_eq!(buckets.error[0].message, "d");
    }

    #[test]
    fn completed_serializes_with_executed_flag() {
        let outcome = ExecutionOutcome::Completed {
            executed: true,
            success: true,
            result: Some(serde_json::json!(2)),
            error: None,
            output: OutputBuckets::default(),
            execution_time_ms: 5,
            execution_id: "id".into(),
            security_analysis: bridge_script::analyze_risk("var x = 1;"),
            warnings: None,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["executed"], serde_json::json!(true));
        assert_eq!(value["result"], serde_json::json!(2));
        assert!(value.get("warnings").is_none());
    }
}
