use bridge_core::config::BridgeConfig;
use bridge_engine::{DirectTrigger, ExecutionBridge};
use bridge_http::TableClient;
use std::time::Duration;

/// Build the HTTP store from config.
pub fn build_store(config: &BridgeConfig) -> anyhow::Result<TableClient> {
    Ok(TableClient::from_config(config)?)
}

/// Build an execution bridge wired to the configured platform.
pub fn build_bridge(config: &BridgeConfig) -> anyhow::Result<ExecutionBridge<TableClient>> {
    let store = build_store(config)?;
    Ok(ExecutionBridge::new(store)
        .with_poll_interval(Duration::from_secs(config.poll_interval_secs))
        .with_default_timeout(Duration::from_secs(config.default_timeout_secs))
        .with_result_key_prefix(config.result_key_prefix.clone())
        .with_manual_url_base(config.base_url.clone()))
}

/// Build a direct trigger path wired to the configured platform.
pub fn build_direct_trigger(config: &BridgeConfig) -> anyhow::Result<DirectTrigger<TableClient>> {
    Ok(DirectTrigger::new(build_store(config)?))
}
