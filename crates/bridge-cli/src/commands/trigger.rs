use crate::dispatch;
use bridge_core::config::BridgeConfig;
use bridge_core::record::JobRef;

pub async fn run(job_id: &str, wait: bool, json: bool) -> anyhow::Result<()> {
    let config = BridgeConfig::load_default()?;
    let direct = dispatch::build_direct_trigger(&config)?;

    let outcome = direct.trigger(&JobRef(job_id.to_string()), wait).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.message);
    println!("Trigger id: {}", outcome.trigger_id);
    if let Some(state) = outcome.final_state {
        println!("Final state: {}", state);
    }
    Ok(())
}
