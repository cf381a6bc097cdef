use protocol::{AnalysisMode, AnalysisResult, DeepAnalysis, QuickAnalysis};
use serde_json::{Map, Value};

use crate::fallback::fallback_analysis;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Outcome of reading a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The reply held a JSON object; it is passed on unchanged.
    Parsed(Map<String, Value>),
    /// Nothing parseable was found; the mode's fixed result stands in.
    Fallback(AnalysisResult),
}

impl Extraction {
    pub fn succeeded(&self) -> bool {
        matches!(self, Extraction::Parsed(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            Extraction::Parsed(map) => Value::Object(map),
            Extraction::Fallback(result) => serde_json::to_value(result).unwrap_or_default(),
        }
    }
}

/// Recovers the analysis object from a model reply. Never fails: any reply
/// that does not yield a JSON object degrades to [`fallback_analysis`].
pub fn extract_analysis(raw_reply: &str, mode: AnalysisMode) -> Extraction {
    let candidate = json_candidate(raw_reply);
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => {
            if let Err(err) = check_shape(&map, mode) {
                tracing::warn!(
                    event = "analysis.extract.shape_mismatch",
                    mode = %mode,
                    error = %err,
                    "model reply parsed but does not match the expected shape"
                );
            }
            Extraction::Parsed(map)
        }
        Ok(other) => {
            tracing::warn!(
                event = "analysis.extract.fallback",
                mode = %mode,
                kind = json_kind(&other),
                "model reply is JSON but not an object"
            );
            Extraction::Fallback(fallback_analysis(mode, raw_reply))
        }
        Err(err) => {
            tracing::warn!(
                event = "analysis.extract.fallback",
                mode = %mode,
                error = %err,
                reply_len = raw_reply.len(),
                "model reply is not parseable JSON"
            );
            Extraction::Fallback(fallback_analysis(mode, raw_reply))
        }
    }
}

/// Picks the text to parse: the first ```json block, else the first
/// generic fenced block, else the whole reply.
pub fn json_candidate(raw_reply: &str) -> &str {
    fenced_block(raw_reply, JSON_FENCE)
        .or_else(|| fenced_block(raw_reply, FENCE))
        .unwrap_or(raw_reply)
}

fn fenced_block<'a>(input: &'a str, opener: &str) -> Option<&'a str> {
    let start = input.find(opener)? + opener.len();
    let rest = &input[start..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find(FENCE)?;
    let block = &rest[..end];
    Some(block.strip_suffix('\n').unwrap_or(block))
}

/// Advisory check of a parsed object against the typed result for `mode`.
/// The object is returned to callers regardless of the outcome.
pub fn check_shape(map: &Map<String, Value>, mode: AnalysisMode) -> Result<(), String> {
    let value = Value::Object(map.clone());
    match mode {
        AnalysisMode::Quick => serde_json::from_value::<QuickAnalysis>(value)
            .map(|_| ())
            .map_err(|err| err.to_string()),
        AnalysisMode::Deep => {
            let parsed =
                serde_json::from_value::<DeepAnalysis>(value).map_err(|err| err.to_string())?;
            if parsed.risk_score > 100 {
                return Err(format!("riskScore {} is above 100", parsed.risk_score));
            }
            Ok(())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
