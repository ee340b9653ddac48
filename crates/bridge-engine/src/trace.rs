use bridge_core::error::BridgeError;
use bridge_core::id::TRACE_KEY_PREFIX;
use bridge_core::store::JobStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TraceSessionOptions {
    pub trace_id: String,
    pub track_queries: bool,
    pub track_events: bool,
    pub max_entries: u32,
    pub ttl_minutes: u32,
    /// Property-key prefix the header is stored under.
    pub key_prefix: String,
}

impl TraceSessionOptions {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            track_queries: true,
            track_events: true,
            max_entries: 100,
            ttl_minutes: 60,
            key_prefix: TRACE_KEY_PREFIX.to_string(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Header record for a trace session. Other remote scripts append to
/// `entries`; this subsystem only writes the header. TTL is advisory
/// metadata for consumers, not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSession {
    pub trace_id: String,
    pub started_at: String,
    pub track_queries: bool,
    pub track_events: bool,
    pub max_entries: u32,
    pub ttl_minutes: u32,
    pub entries: Vec<serde_json::Value>,
    pub status: String,
}

/// Idempotent upsert of a trace session header. An existing session
/// under the same id is overwritten with a fresh header, entries
/// reset: this is a restart, not an append. Lookup-then-write, last
/// writer wins.
pub async fn start_trace_session<S: JobStore>(
    store: &S,
    options: TraceSessionOptions,
) -> Result<TraceSession, BridgeError> {
    let key = format!("{}{}", options.key_prefix, options.trace_id);

    match store.get_property(&key).await? {
        Some(_) => debug!("Restarting existing trace session {}", options.trace_id),
        None => debug!("Creating trace session {}", options.trace_id),
    }

    let session = TraceSession {
        trace_id: options.trace_id.clone(),
        started_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        track_queries: options.track_queries,
        track_events: options.track_events,
        max_entries: options.max_entries,
        ttl_minutes: options.ttl_minutes,
        entries: Vec::new(),
        status: "active".to_string(),
    };

    let value = serde_json::to_string(&session)?;
    store
        .set_property(&key, &value, "Bridge trace session header")
        .await?;
    info!("Trace session {} active under {}", session.trace_id, key);

    Ok(session)
}
