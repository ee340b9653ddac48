use serde::{Deserialize, Serialize};
use std::fmt;

/// Default property-key prefix for execution result markers.
pub const RESULT_KEY_PREFIX: &str = "bridge.execution.result.";

/// Default property-key prefix for trace session headers.
pub const TRACE_KEY_PREFIX: &str = "bridge.trace.session.";

/// Unique token minted per bridge invocation. Embedded in job names and
/// result-marker keys so the poller can correlate them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Property key the instrumented script writes its result under.
    pub fn result_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }

    /// Human-readable job name carrying the id for traceability.
    pub fn job_name(&self) -> String {
        format!("Bridge Execution {}", self.0)
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(ExecutionId::new().0));
        }
    }

    #[test]
    fn result_keys_do_not_collide() {
        let a = ExecutionId::new();
        let b = ExecutionId::new();
        assert_ne!(
            a.result_key(RESULT_KEY_PREFIX),
            b.result_key(RESULT_KEY_PREFIX)
        );
    }

    #[test]
    fn result_key_embeds_id() {
        let id = ExecutionId::from_string("abc-123".into());
        assert_eq!(
            id.result_key(RESULT_KEY_PREFIX),
            "bridge.execution.result.abc-123"
        );
    }
}
