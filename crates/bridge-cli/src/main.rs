use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod dispatch;

#[derive(Parser)]
#[command(name = "jobbridge")]
#[command(about = "Run scripts on a remote async job scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a script, trigger it, and wait for the result
    Run {
        /// Script text (or use --file)
        script: Option<String>,

        /// Read the script from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Human-readable description embedded in the job
        #[arg(short, long)]
        description: Option<String>,

        /// Seconds to wait for completion
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Skip the dialect-compatibility check
        #[arg(long)]
        no_dialect_check: bool,

        /// Always require interactive confirmation
        #[arg(long)]
        confirm: bool,

        /// Auto-confirm: skip the confirmation gate
        #[arg(short, long)]
        yes: bool,

        /// Pre-approve data-modifying calls
        #[arg(long)]
        allow_writes: bool,

        /// Remote user the job should run as
        #[arg(long)]
        as_user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trigger a job that already exists on the platform
    Trigger {
        /// Job id
        job_id: String,

        /// Poll the trigger state until it finishes
        #[arg(short, long)]
        wait: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start (or restart) a trace session header record
    Trace {
        /// Trace session id
        trace_id: String,

        /// Entry cap advertised to trace producers
        #[arg(long, default_value = "100")]
        max_entries: u32,

        /// Advisory TTL in minutes
        #[arg(long, default_value = "60")]
        ttl_minutes: u32,

        /// Disable query tracking
        #[arg(long)]
        no_queries: bool,

        /// Disable event tracking
        #[arg(long)]
        no_events: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a script locally without submitting it
    Validate {
        /// Script text (or use --file)
        script: Option<String>,

        /// Read the script from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or locate the configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    use Commands::*;

    match cli.command {
        Run {
            script,
            file,
            description,
            timeout,
            no_dialect_check,
            confirm,
            yes,
            allow_writes,
            as_user,
            json,
        } => {
            commands::run::run(commands::run::RunArgs {
                script,
                file,
                description,
                timeout,
                no_dialect_check,
                confirm,
                yes,
                allow_writes,
                as_user,
                json,
            })
            .await?;
        }
        Trigger { job_id, wait, json } => {
            commands::trigger::run(&job_id, wait, json).await?;
        }
        Trace {
            trace_id,
            max_entries,
            ttl_minutes,
            no_queries,
            no_events,
            json,
        } => {
            commands::trace::run(&trace_id, max_entries, ttl_minutes, no_queries, no_events, json)
                .await?;
        }
        Validate { script, file, json } => {
            commands::validate::run(script, file, json)?;
        }
        Config { action } => {
            commands::config::run(action)?;
        }
    }

    Ok(())
}
