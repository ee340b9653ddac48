//! HTTP backend for the jobbridge `JobStore`.
//!
//! The remote platform exposes a generic table API: JSON records under
//! `/api/table/{collection}` with create (POST), read (GET), patch
//! (PATCH), and delete (DELETE). Responses wrap the record(s) in a
//! `result` envelope. This module maps the `JobStore` trait onto those
//! calls; it holds no state beyond the configured client.

use bridge_core::config::BridgeConfig;
use bridge_core::error::BridgeError;
use bridge_core::record::{
    JobRef, NewJob, NewTrigger, PropertyRef, StoredProperty, TriggerRef, TriggerState,
};
use bridge_core::store::JobStore;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use std::env;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
enum Auth {
    Bearer(String),
    Basic(String, String),
    None,
}

/// Configured client for one remote platform instance.
#[derive(Debug, Clone)]
pub struct TableClient {
    base_url: String,
    http: Client,
    auth: Auth,
    job_table: String,
    trigger_table: String,
    property_table: String,
}

impl TableClient {
    /// Build a client from config. Credentials resolve from the
    /// environment variables named in the config: a token first, then
    /// a username/password pair.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        validate_base_url(&config.base_url)?;

        let auth = if let Ok(token) = env::var(&config.auth.token_env) {
            Auth::Bearer(token)
        } else {
            match (
                env::var(&config.auth.user_env),
                env::var(&config.auth.password_env),
            ) {
                (Ok(user), Ok(password)) => Auth::Basic(user, password),
                _ => Auth::None,
            }
        };

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BridgeError::Config(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            auth,
            job_table: config.tables.job.clone(),
            trigger_table: config.tables.trigger.clone(),
            property_table: config.tables.property.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.auth {
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::Basic(user, password) => builder.basic_auth(user, Some(password)),
            Auth::None => builder,
        }
    }

    fn table_path(&self, table: &str) -> String {
        format!("/api/table/{}", table)
    }

    fn record_path(&self, table: &str, id: &str) -> String {
        format!("/api/table/{}/{}", table, id)
    }

    /// POST a record; return the store-assigned id from the envelope.
    async fn create_record(
        &self,
        table: &str,
        body: &serde_json::Value,
    ) -> Result<String, BridgeError> {
        let response = self
            .request(Method::POST, &self.table_path(table))
            .json(body)
            .send()
            .await
            .map_err(|e| BridgeError::Store(format!("POST {}: {}", table, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Store(format!(
                "POST {} returned {}",
                table, status
            )));
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BridgeError::Store(format!("POST {} response body: {}", table, e)))?;
        record_id(&envelope)
            .ok_or_else(|| BridgeError::Store(format!("POST {}: no record id in response", table)))
    }

    async fn get_record(
        &self,
        table: &str,
        id: &str,
    ) -> Result<serde_json::Value, BridgeError> {
        let response = self
            .request(Method::GET, &self.record_path(table, id))
            .send()
            .await
            .map_err(|e| BridgeError::Store(format!("GET {}/{}: {}", table, id, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BridgeError::NotFound(id.to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Store(format!(
                "GET {}/{} returned {}",
                table, id, status
            )));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| BridgeError::Store(format!("GET {}/{} body: {}", table, id, e)))
    }

    async fn delete_record(&self, table: &str, id: &str) -> Result<(), BridgeError> {
        let response = self
            .request(Method::DELETE, &self.record_path(table, id))
            .send()
            .await
            .map_err(|e| BridgeError::Store(format!("DELETE {}/{}: {}", table, id, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BridgeError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(BridgeError::Store(format!(
                "DELETE {}/{} returned {}",
                table, id, status
            )));
        }
        Ok(())
    }
}

/// Pull the record id out of a single-record `result` envelope.
fn record_id(envelope: &serde_json::Value) -> Option<String> {
    envelope
        .get("result")?
        .get("id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Parse a trigger state field, which arrives as a number or a
/// numeric string depending on the platform version.
fn parse_trigger_state(record: &serde_json::Value) -> Option<TriggerState> {
    let state = record.get("result")?.get("state")?;
    let raw = match state {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    Some(TriggerState::from_raw(raw))
}

/// Accept http only for localhost; everything else must be https.
fn validate_base_url(base: &str) -> Result<(), BridgeError> {
    let parsed = Url::parse(base)
        .map_err(|e| BridgeError::Config(format!("Invalid base_url '{}': {}", base, e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| BridgeError::Config("base_url must include a host".into()))?;

    let local = host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1";
    if !local && parsed.scheme() != "https" {
        return Err(BridgeError::Config(format!(
            "base_url must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl JobStore for TableClient {
    async fn create_job(&self, job: &NewJob) -> Result<JobRef, BridgeError> {
        let mut body = serde_json::json!({
            "name": job.name,
            "script": job.script,
            "active": job.active,
            "run_type": job.run_type,
        });
        if let Some(run_as) = &job.run_as {
            body["run_as"] = serde_json::json!(run_as);
        }
        let id = self
            .create_record(&self.job_table, &body)
            .await
            .map_err(|e| BridgeError::JobCreate(e.to_string()))?;
        Ok(JobRef(id))
    }

    async fn delete_job(&self, job: &JobRef) -> Result<(), BridgeError> {
        self.delete_record(&self.job_table, &job.0).await
    }

    async fn create_trigger(&self, trigger: &NewTrigger) -> Result<TriggerRef, BridgeError> {
        let body = serde_json::json!({
            "name": trigger.name,
            "job_id": trigger.job_id.0,
            "next_action": trigger.next_action,
            "trigger_type": trigger.trigger_type,
        });
        let id = self
            .create_record(&self.trigger_table, &body)
            .await
            .map_err(|e| BridgeError::TriggerCreate(e.to_string()))?;
        Ok(TriggerRef(id))
    }

    async fn get_trigger_state(&self, trigger: &TriggerRef) -> Result<TriggerState, BridgeError> {
        let record = self.get_record(&self.trigger_table, &trigger.0).await?;
        parse_trigger_state(&record).ok_or_else(|| {
            BridgeError::Store(format!("trigger {} has no readable state", trigger.0))
        })
    }

    async fn get_property(&self, key: &str) -> Result<Option<StoredProperty>, BridgeError> {
        let response = self
            .request(Method::GET, &self.table_path(&self.property_table))
            .query(&[("name", key), ("limit", "1")])
            .send()
            .await
            .map_err(|e| BridgeError::Store(format!("GET property {}: {}", key, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Store(format!(
                "GET property {} returned {}",
                key, status
            )));
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BridgeError::Store(format!("GET property {} body: {}", key, e)))?;

        let rows = envelope
            .get("result")
            .and_then(|r| r.as_array())
            .ok_or_else(|| {
                BridgeError::Store(format!("GET property {}: malformed envelope", key))
            })?;

        match rows.first() {
            Some(row) => {
                let id = row
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        BridgeError::Store(format!("property {} row missing id", key))
                    })?;
                let value = row
                    .get("value")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                Ok(Some(StoredProperty {
                    id: PropertyRef(id.to_string()),
                    name: key.to_string(),
                    value: value.to_string(),
                }))
            }
            None => Ok(None),
        }
    }

    async fn set_property(
        &self,
        key: &str,
        value: &str,
        description: &str,
    ) -> Result<(), BridgeError> {
        // Lookup-then-write; last writer wins.
        match self.get_property(key).await? {
            Some(existing) => {
                let body = serde_json::json!({ "value": value });
                let response = self
                    .request(
                        Method::PATCH,
                        &self.record_path(&self.property_table, &existing.id.0),
                    )
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| BridgeError::Store(format!("PATCH property {}: {}", key, e)))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(BridgeError::Store(format!(
                        "PATCH property {} returned {}",
                        key, status
                    )));
                }
                Ok(())
            }
            None => {
                let body = serde_json::json!({
                    "name": key,
                    "value": value,
                    "description": description,
                });
                self.create_record(&self.property_table, &body).await?;
                Ok(())
            }
        }
    }

    async fn delete_property(&self, id: &PropertyRef) -> Result<(), BridgeError> {
        self.delete_record(&self.property_table, &id.0).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_rules() {
        assert!(validate_base_url("https://dev.example.com").is_ok());
        assert!(validate_base_url("http://localhost:8080").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("http://dev.example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn record_id_from_envelope() {
        let envelope = serde_json::json!({"result": {"id": "abc123", "name": "x"}});
        assert_eq!(record_id(&envelope), Some("abc123".to_string()));
        assert_eq!(record_id(&serde_json::json!({"result": {}})), None);
        assert_eq!(record_id(&serde_json::json!({})), None);
    }

    #[test]
    fn trigger_state_from_number_or_string() {
        let numeric = serde_json::json!({"result": {"state": 2}});
        assert_eq!(parse_trigger_state(&numeric), Some(TriggerState::Executed));

        let stringly = serde_json::json!({"result": {"state": "3"}});
        assert_eq!(parse_trigger_state(&stringly), Some(TriggerState::Error));

        let junk = serde_json::json!({"result": {"state": [1]}});
        assert_eq!(parse_trigger_state(&junk), None);
    }
}
