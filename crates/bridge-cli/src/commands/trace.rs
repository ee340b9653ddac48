use crate::dispatch;
use bridge_core::config::BridgeConfig;
use bridge_engine::TraceSessionOptions;

pub async fn run(
    trace_id: &str,
    max_entries: u32,
    ttl_minutes: u32,
    no_queries: bool,
    no_events: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = BridgeConfig::load_default()?;
    let store = dispatch::build_store(&config)?;

    let mut options =
        TraceSessionOptions::new(trace_id).with_key_prefix(config.trace_key_prefix.clone());
    options.max_entries = max_entries;
    options.ttl_minutes = ttl_minutes;
    options.track_queries = !no_queries;
    options.track_events = !no_events;

    let session = bridge_engine::start_trace_session(&store, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!("Trace session '{}' is {}", session.trace_id, session.status);
    println!(
        "Started {} (max {} entries, ttl {} min)",
        session.started_at, session.max_entries, session.ttl_minutes
    );
    Ok(())
}
