use crate::dispatch;
use bridge_core::config::BridgeConfig;
use bridge_engine::{ExecutionOutcome, ExecutionRequest, OutputBuckets};
use std::path::PathBuf;
use std::time::Duration;

pub struct RunArgs {
    pub script: Option<String>,
    pub file: Option<PathBuf>,
    pub description: Option<String>,
    pub timeout: Option<u64>,
    pub no_dialect_check: bool,
    pub confirm: bool,
    pub yes: bool,
    pub allow_writes: bool,
    pub as_user: Option<String>,
    pub json: bool,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let script = super::read_script(args.script, args.file)?;
    let config = BridgeConfig::load_default()?;
    let bridge = dispatch::build_bridge(&config)?;

    let mut request = ExecutionRequest::new(script);
    request.description = args.description;
    request.timeout = args.timeout.map(Duration::from_secs);
    request.validate_dialect = !args.no_dialect_check;
    request.require_confirmation = args.confirm;
    request.auto_confirm = args.yes;
    request.allow_data_modification = args.allow_writes;
    request.run_as_user = args.as_user;

    let outcome = bridge.run(request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Completed {
            success,
            result,
            error,
            output,
            execution_time_ms,
            execution_id,
            warnings,
            ..
        } => {
            if *success {
                println!("Completed in {}ms (execution {})", execution_time_ms, execution_id);
                if let Some(result) = result {
                    println!("Result: {}", result);
                }
            } else {
                println!("Script failed (execution {})", execution_id);
                if let Some(error) = error {
                    println!("Error: {}", error);
                }
            }
            print_output(output);
            if let Some(warnings) = warnings {
                for warning in warnings {
                    println!("warning: {}", warning);
                }
            }
        }
        ExecutionOutcome::Abandoned {
            execution_id,
            scheduled_job_id,
            message,
            action_required,
            manual_url,
            ..
        } => {
            println!("Pending: {}", message);
            println!("Execution id: {}", execution_id);
            println!("Job id:       {}", scheduled_job_id);
            println!("{}", action_required);
            println!("Manual run:   {}", manual_url);
        }
        ExecutionOutcome::ConfirmationRequired {
            confirmation_prompt,
            next_step,
            ..
        } => {
            println!("{}", confirmation_prompt);
            println!("{} (re-run with --yes to proceed)", next_step);
        }
    }
}

fn print_output(output: &OutputBuckets) {
    if output.total() == 0 {
        return;
    }
    for line in &output.print {
        println!("[print] {}", line.message);
    }
    for line in &output.info {
        println!("[info]  {}", line.message);
    }
    for line in &output.warn {
        println!("[warn]  {}", line.message);
    }
    for line in &output.error {
        println!("[error] {}", line.message);
    }
}
