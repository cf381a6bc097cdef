use protocol::{
    AnalysisMode, AnalysisResult, Confidence, DeepAnalysis, DeepRiskLevel, QuickAnalysis,
    QuickRiskLevel,
};

const QUICK_SUMMARY: &str =
    "Analysis incomplete. Please exercise caution and do additional research.";
const QUICK_FINDING: &str = "Could not complete full analysis";
const QUICK_RECOMMENDATION: &str = "Verify this investment through official regulatory channels.";

const DEEP_SCORE: u8 = 50;
const DEEP_SUMMARY: &str = "Unable to fully analyze. Please verify through official channels.";
const DEEP_REGULATORY_STATUS: &str = "Unknown";
const DEEP_RECOMMENDATIONS: [&str; 2] = ["Verify with local regulators", "Do thorough due diligence"];

/// Fixed result used when the model reply holds no usable JSON object.
/// Deep mode keeps the raw reply as `companyAnalysis` so nothing the model
/// said is lost.
pub fn fallback_analysis(mode: AnalysisMode, raw_reply: &str) -> AnalysisResult {
    match mode {
        AnalysisMode::Quick => AnalysisResult::Quick(QuickAnalysis {
            risk_level: QuickRiskLevel::Warning,
            summary: QUICK_SUMMARY.to_string(),
            key_findings: vec![QUICK_FINDING.to_string()],
            recommendation: QUICK_RECOMMENDATION.to_string(),
        }),
        AnalysisMode::Deep => AnalysisResult::Deep(DeepAnalysis {
            risk_score: DEEP_SCORE,
            risk_level: DeepRiskLevel::Medium,
            summary: DEEP_SUMMARY.to_string(),
            company_analysis: raw_reply.to_string(),
            red_flags: Vec::new(),
            green_flags: Vec::new(),
            regulatory_status: DEEP_REGULATORY_STATUS.to_string(),
            similar_scams: Vec::new(),
            recommendations: DEEP_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
            confidence: Confidence::Low,
        }),
    }
}
