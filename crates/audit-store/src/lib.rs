//! Append-only storage for analysis audit entries.

mod jsonl;
mod memory;
mod rest;

use async_trait::async_trait;
use protocol::audit::AuditLogEntry;

pub use jsonl::JsonlAuditSink;
pub use memory::MemoryAuditSink;
pub use rest::RestAuditSink;

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditLogEntry) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}

/// Accepts entries and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAuditSink;

#[async_trait]
impl AuditSink for DisabledAuditSink {
    async fn record(&self, entry: &AuditLogEntry) -> anyhow::Result<()> {
        tracing::debug!(event = "audit.disabled", id = %entry.id, "audit entry dropped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
