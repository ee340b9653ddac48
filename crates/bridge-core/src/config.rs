use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
/// Loaded from ~/.config/jobbridge/config.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the remote platform, e.g. "https://dev.example.com".
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub tables: TableNames,
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_result_key_prefix")]
    pub result_key_prefix: String,
    #[serde(default = "default_trace_key_prefix")]
    pub trace_key_prefix: String,
}

/// Credentials are resolved from environment variables named here, so
/// the config file itself never holds secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_env")]
    pub user_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            user_env: default_user_env(),
            password_env: default_password_env(),
        }
    }
}

/// Collection names on the remote table API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableNames {
    #[serde(default = "default_job_table")]
    pub job: String,
    #[serde(default = "default_trigger_table")]
    pub trigger: String,
    #[serde(default = "default_property_table")]
    pub property: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            job: default_job_table(),
            trigger: default_trigger_table(),
            property: default_property_table(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_result_key_prefix() -> String {
    crate::id::RESULT_KEY_PREFIX.to_string()
}

fn default_trace_key_prefix() -> String {
    crate::id::TRACE_KEY_PREFIX.to_string()
}

fn default_token_env() -> String {
    "JOBBRIDGE_TOKEN".to_string()
}

fn default_user_env() -> String {
    "JOBBRIDGE_USER".to_string()
}

fn default_password_env() -> String {
    "JOBBRIDGE_PASSWORD".to_string()
}

fn default_job_table() -> String {
    "scheduled_script_job".to_string()
}

fn default_trigger_table() -> String {
    "job_trigger".to_string()
}

fn default_property_table() -> String {
    "system_property".to_string()
}

impl BridgeConfig {
    /// Load config from the default path (~/.config/jobbridge/config.yaml).
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            anyhow::bail!(
                "No config found at {}; run `jobbridge config path` for details",
                path.display()
            )
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BridgeConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("jobbridge")
            .join("config.yaml")
    }
}

/// URL a human can open to run an abandoned job manually.
pub fn manual_run_url(base_url: &str, job: &crate::record::JobRef) -> String {
    format!("{}/ui/job/{}", base_url.trim_end_matches('/'), job.0)
}
