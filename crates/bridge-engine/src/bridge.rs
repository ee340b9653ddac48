use crate::outcome::{ExecutionOutcome, OutputBuckets};
use bridge_core::error::BridgeError;
use bridge_core::id::{ExecutionId, RESULT_KEY_PREFIX};
use bridge_core::record::{ExecutionReport, JobRef, NewJob, NewTrigger};
use bridge_core::store::JobStore;
use bridge_script::{analyze_risk, check_dialect, wrap_script, RiskAnalysis, RiskLevel};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How far ahead of "now" a submission trigger is scheduled.
const TRIGGER_LEAD_SECS: i64 = 2;

/// One script-execution request from the caller.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub script: String,
    pub description: Option<String>,
    pub timeout: Option<Duration>,
    pub validate_dialect: bool,
    pub require_confirmation: bool,
    pub auto_confirm: bool,
    pub allow_data_modification: bool,
    pub run_as_user: Option<String>,
}

impl ExecutionRequest {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            description: None,
            timeout: None,
            validate_dialect: true,
            require_confirmation: false,
            auto_confirm: false,
            allow_data_modification: false,
            run_as_user: None,
        }
    }
}

/// Orchestrates one submission: create job, create trigger, poll for
/// the result marker, clean up, return an outcome.
///
/// States run Created -> Triggered -> Polling -> {Completed, Abandoned}.
/// Only job creation is fatal; trigger creation, poll iterations, and
/// cleanup are each tolerated individually.
pub struct ExecutionBridge<S> {
    store: S,
    poll_interval: Duration,
    default_timeout: Duration,
    result_key_prefix: String,
    manual_url_base: String,
}

impl<S: JobStore> ExecutionBridge<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            poll_interval: Duration::from_secs(2),
            default_timeout: Duration::from_secs(30),
            result_key_prefix: RESULT_KEY_PREFIX.to_string(),
            manual_url_base: String::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_result_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.result_key_prefix = prefix.into();
        self
    }

    /// Base URL used to build the manual-run link in Abandoned outcomes.
    pub fn with_manual_url_base(mut self, base: impl Into<String>) -> Self {
        self.manual_url_base = base.into();
        self
    }

    /// Full entry point: validate, pass the confirmation gate, then
    /// submit and await.
    pub async fn run(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, BridgeError> {
        let analysis = analyze_risk(&request.script);

        if self.needs_confirmation(&request, &analysis) && !request.auto_confirm {
            return Ok(self.confirmation_payload(&request, &analysis));
        }

        self.run_confirmed(request).await
    }

    /// Confirmed entry point: skips the gate and enters the state
    /// machine at job creation. Used when the caller has already
    /// approved the script.
    pub async fn run_confirmed(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionOutcome, BridgeError> {
        let analysis = analyze_risk(&request.script);
        let warnings = self.dialect_warnings(&request);
        let execution_id = ExecutionId::new();
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let description = request.description.as_deref().unwrap_or("Bridge execution");
        let wrapped = wrap_script(
            &request.script,
            description,
            &execution_id.0,
            &self.result_key_prefix,
        );

        // Created: the only fatal step. No remote state exists yet, so
        // there is nothing to clean up on failure.
        let mut new_job = NewJob::on_demand(execution_id.job_name(), wrapped);
        new_job.run_as = request.run_as_user.clone();
        let job = self.store.create_job(&new_job).await?;
        info!("Created job {} for execution {}", job, execution_id);

        // Triggered: non-fatal. The scheduler may still pick the job
        // up on its own cadence.
        let trigger = NewTrigger::run_once(
            format!("Bridge Trigger {}", execution_id),
            job.clone(),
            chrono::Duration::seconds(TRIGGER_LEAD_SECS),
        );
        match self.store.create_trigger(&trigger).await {
            Ok(trigger_ref) => debug!("Created trigger {} for job {}", trigger_ref, job),
            Err(e) => warn!(
                "Trigger creation failed for job {}; continuing to poll: {}",
                job, e
            ),
        }

        // Polling.
        let key = execution_id.result_key(&self.result_key_prefix);
        match self.poll_for_report(&key, timeout).await {
            Some(report) => Ok(self
                .complete(&job, &execution_id, report, analysis, warnings)
                .await),
            None => Ok(self.abandon(&job, &execution_id, timeout)),
        }
    }

    fn needs_confirmation(&self, request: &ExecutionRequest, analysis: &RiskAnalysis) -> bool {
        request.require_confirmation
            || analysis.risk_level == RiskLevel::High
            || (analysis.risk_level == RiskLevel::Medium && !request.allow_data_modification)
    }

    fn confirmation_payload(
        &self,
        request: &ExecutionRequest,
        analysis: &RiskAnalysis,
    ) -> ExecutionOutcome {
        let mut prompt = format!(
            "Script risk level is {}. Review before executing.",
            analysis.risk_level
        );
        if !analysis.data_modifications.is_empty() {
            prompt.push_str(&format!(
                " Data modifications detected: {}.",
                analysis.data_modifications.join(", ")
            ));
        }
        for warning in &analysis.warnings {
            prompt.push_str(&format!(" {}.", warning));
        }
        ExecutionOutcome::ConfirmationRequired {
            requires_confirmation: true,
            confirmation_prompt: prompt,
            script_to_execute: request.script.clone(),
            next_step: "Re-submit with confirmation to execute this script".to_string(),
        }
    }

    fn dialect_warnings(&self, request: &ExecutionRequest) -> Option<Vec<String>> {
        if !request.validate_dialect {
            return None;
        }
        let findings = check_dialect(&request.script);
        if findings.is_empty() {
            return None;
        }
        Some(
            findings
                .iter()
                .map(|f| {
                    format!(
                        "Line {}: {} may not be supported by the remote runtime: {}",
                        f.line, f.kind, f.snippet
                    )
                })
                .collect(),
        )
    }

    /// Poll the property store for the result marker until it appears
    /// or `timeout` elapses. Read and parse failures on a single
    /// iteration are swallowed; only timeout ends the loop empty.
    async fn poll_for_report(&self, key: &str, timeout: Duration) -> Option<ExecutionReport> {
        let started = Instant::now();
        loop {
            if started.elapsed() >= timeout {
                return None;
            }
            match self.store.get_property(key).await {
                Ok(Some(property)) => {
                    match serde_json::from_str::<ExecutionReport>(&property.value) {
                        Ok(report) => {
                            // Delete-on-read: the marker carries exactly
                            // one result and must not outlive it.
                            if let Err(e) = self.store.delete_property(&property.id).await {
                                warn!("Failed to delete result marker {}: {}", property.id, e);
                            }
                            return Some(report);
                        }
                        Err(e) => {
                            debug!("Result marker {} not yet parseable: {}", key, e);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Poll read for {} failed, retrying: {}", key, e);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn complete(
        &self,
        job: &JobRef,
        execution_id: &ExecutionId,
        report: ExecutionReport,
        analysis: RiskAnalysis,
        warnings: Option<Vec<String>>,
    ) -> ExecutionOutcome {
        // Best-effort cleanup: the caller already has a result, so a
        // leaked job is a tolerated cost.
        if let Err(e) = self.store.delete_job(job).await {
            warn!("Failed to delete completed job {}: {}", job, e);
        }

        info!(
            "Execution {} completed in {}ms (success: {})",
            execution_id, report.execution_time_ms, report.success
        );

        ExecutionOutcome::Completed {
            executed: true,
            success: report.success,
            result: report.result,
            error: report.error,
            output: OutputBuckets::partition(&report.output),
            execution_time_ms: report.execution_time_ms,
            execution_id: execution_id.0.clone(),
            security_analysis: analysis,
            warnings,
        }
    }

    fn abandon(
        &self,
        job: &JobRef,
        execution_id: &ExecutionId,
        timeout: Duration,
    ) -> ExecutionOutcome {
        // The job is deliberately retained so a human can run it.
        warn!(
            "Execution {} not confirmed within {:?}; job {} retained",
            execution_id, timeout, job
        );
        ExecutionOutcome::Abandoned {
            executed: false,
            execution_id: execution_id.0.clone(),
            scheduled_job_id: job.0.clone(),
            message: format!(
                "Script was submitted but completion was not confirmed within {}s. \
                 The scheduler may still run it.",
                timeout.as_secs()
            ),
            action_required: "Run the job manually from the remote console, then delete it."
                .to_string(),
            manual_url: bridge_core::config::manual_run_url(&self.manual_url_base, job),
        }
    }
}
