use async_trait::async_trait;
use protocol::audit::AuditLogEntry;
use tokio::sync::Mutex;

use crate::AuditSink;

/// Keeps entries in process. `failing()` builds a sink that rejects every
/// write, for exercising the swallow-on-failure path.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail: bool,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: &AuditLogEntry) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("audit store unavailable");
        }
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
