use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use protocol::audit::AuditLogEntry;
use protocol::AnalysisMode;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::AuditSink;

/// Inserts entries as rows through a PostgREST-style endpoint
/// (`{base_url}/rest/v1/{table}`). Every insert is bounded by `timeout`, so a
/// stalled store cannot hold up the request that produced the entry.
pub struct RestAuditSink {
    url: String,
    api_key: String,
    http: Client,
}

#[derive(Serialize)]
struct AuditRow<'a> {
    id: &'a str,
    user_id: Option<&'a str>,
    query: &'a str,
    analysis_type: AnalysisMode,
    result: Value,
    success: bool,
    created_at: &'a str,
}

impl<'a> AuditRow<'a> {
    fn from_entry(entry: &'a AuditLogEntry) -> Self {
        let result = serde_json::from_str(&entry.serialized_result)
            .unwrap_or_else(|_| Value::String(entry.serialized_result.clone()));
        Self {
            id: &entry.id,
            user_id: entry.requester_id.as_deref(),
            query: &entry.query,
            analysis_type: entry.mode,
            result,
            success: entry.succeeded,
            created_at: &entry.created_at,
        }
    }
}

impl RestAuditSink {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            anyhow::bail!("audit base_url is empty");
        }
        let table = table.trim();
        if table.is_empty() {
            anyhow::bail!("audit table is empty");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build audit http client")?;
        Ok(Self {
            url: format!("{base}/rest/v1/{table}"),
            api_key: api_key.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AuditSink for RestAuditSink {
    async fn record(&self, entry: &AuditLogEntry) -> anyhow::Result<()> {
        let response = self
            .http
            .post(&self.url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&AuditRow::from_entry(entry))
            .send()
            .await
            .with_context(|| format!("audit insert to {} failed", self.url))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("audit insert status={} body={}", status, body);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
