use crate::{AnalysisMode, AnalysisRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

/// One row of the append-only analysis audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub requester_id: Option<String>,
    pub query: String,
    pub mode: AnalysisMode,
    pub serialized_result: String,
    pub succeeded: bool,
    pub created_at: String,
}

impl AuditLogEntry {
    pub fn new(request: &AnalysisRequest, result: &Value, succeeded: bool) -> Self {
        Self::at(request, result, succeeded, SystemTime::now())
    }

    pub fn at(request: &AnalysisRequest, result: &Value, succeeded: bool, time: SystemTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id: request.requester_id.clone(),
            query: request.query.clone(),
            mode: request.mode,
            serialized_result: result.to_string(),
            succeeded,
            created_at: humantime::format_rfc3339_millis(time).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn entry_captures_request_and_result() {
        let request = AnalysisRequest {
            query: "Acme coin".to_string(),
            mode: AnalysisMode::Deep,
            requester_id: Some("u-1".to_string()),
        };
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let entry = AuditLogEntry::at(&request, &json!({ "riskScore": 50 }), false, time);
        assert_eq!(entry.requester_id.as_deref(), Some("u-1"));
        assert_eq!(entry.mode, AnalysisMode::Deep);
        assert_eq!(entry.serialized_result, r#"{"riskScore":50}"#);
        assert!(!entry.succeeded);
        assert_eq!(entry.created_at, "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn entries_get_distinct_ids() {
        let request = AnalysisRequest {
            query: "q".to_string(),
            mode: AnalysisMode::Quick,
            requester_id: None,
        };
        let first = AuditLogEntry::new(&request, &Value::Null, true);
        let second = AuditLogEntry::new(&request, &Value::Null, true);
        assert_ne!(first.id, second.id);
    }
}
