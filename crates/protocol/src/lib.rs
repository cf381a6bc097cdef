use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub mod audit;
pub mod config;

/// Which prompt and result shape a scam-risk analysis uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Quick,
    Deep,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Quick => "quick",
            AnalysisMode::Deep => "deep",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(AnalysisMode::Quick),
            "deep" => Ok(AnalysisMode::Deep),
            other => Err(format!("analysisType must be quick|deep, got {other:?}")),
        }
    }
}

/// Body of `POST /analyze` as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub query: String,
    pub mode: AnalysisMode,
    pub requester_id: Option<String>,
}

impl AnalyzeRequest {
    pub fn validate(self) -> Result<AnalysisRequest, String> {
        let query = self.query.as_deref().unwrap_or("").trim();
        if query.is_empty() {
            return Err("Please provide an investment, company or offer to analyze".to_string());
        }
        let mode = match self.analysis_type.as_deref() {
            None => AnalysisMode::default(),
            Some(raw) => raw.parse()?,
        };
        let requester_id = self
            .user_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(AnalysisRequest {
            query: query.to_string(),
            mode,
            requester_id,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuickRiskLevel {
    Safe,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeepRiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuickAnalysis {
    pub risk_level: QuickRiskLevel,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeepAnalysis {
    pub risk_score: u8,
    pub risk_level: DeepRiskLevel,
    pub summary: String,
    pub company_analysis: String,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    pub regulatory_status: String,
    pub similar_scams: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnalysisResult {
    Quick(QuickAnalysis),
    Deep(DeepAnalysis),
}

/// Success body of `POST /analyze`. `analysis` carries the model's object
/// unchanged when it parsed, so it stays an untyped JSON value here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Value,
    pub analysis_type: AnalysisMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /tutor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TutorRequest {
    /// Client turns only; the persona prompt is the gateway's to add.
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must contain at least one turn".to_string());
        }
        if let Some(index) = self
            .messages
            .iter()
            .position(|turn| turn.role == ChatRole::System)
        {
            return Err(format!("messages[{index}] uses reserved role system"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TutorResponse {
    pub response: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
