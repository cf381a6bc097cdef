use std::time::Instant;

use audit_store::AuditSink;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use protocol::audit::AuditLogEntry;
use protocol::{AnalyzeRequest, AnalyzeResponse, TutorRequest, TutorResponse};
use risk_analysis::{extract_analysis, prompts};

use crate::app::AppState;
use crate::error::ApiError;

const ANALYZE_FAILED: &str = "Failed to analyze this investment. Please try again.";
const TUTOR_FAILED: &str = "The tutor could not answer right now. Please try again.";

pub(crate) async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(raw) = body.map_err(|err| ApiError::bad_request(err.body_text()))?;
    let request = raw.validate().map_err(ApiError::bad_request)?;

    let started = Instant::now();
    let turns = prompts::analysis_turns(request.mode, &request.query);
    let reply = state.chat.complete(&turns).await.map_err(|err| {
        tracing::error!(
            event = "analyze.upstream.failed",
            mode = %request.mode,
            error = %err,
            "analysis request failed upstream"
        );
        ApiError::upstream(&err, ANALYZE_FAILED)
    })?;

    let extraction = extract_analysis(&reply, request.mode);
    let succeeded = extraction.succeeded();
    let analysis = extraction.into_value();

    let entry = AuditLogEntry::new(&request, &analysis, succeeded);
    record_best_effort(state.audit.as_ref(), &entry).await;

    tracing::info!(
        event = "analyze.completed",
        mode = %request.mode,
        parsed = succeeded,
        requester = ?request.requester_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis completed"
    );
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        analysis_type: request.mode,
    }))
}

pub(crate) async fn tutor(
    State(state): State<AppState>,
    body: Result<Json<TutorRequest>, JsonRejection>,
) -> Result<Json<TutorResponse>, ApiError> {
    let Json(request) = body.map_err(|err| ApiError::bad_request(err.body_text()))?;
    request.validate().map_err(ApiError::bad_request)?;

    let turns = prompts::tutor_turns(&request.messages);
    let reply = state.chat.complete(&turns).await.map_err(|err| {
        tracing::error!(
            event = "tutor.upstream.failed",
            error = %err,
            "tutor request failed upstream"
        );
        ApiError::upstream(&err, TUTOR_FAILED)
    })?;
    if reply.trim().is_empty() {
        tracing::warn!(event = "tutor.reply.empty", "tutor reply had no content");
        return Err(ApiError::internal(TUTOR_FAILED));
    }

    tracing::info!(
        event = "tutor.completed",
        turns = request.messages.len(),
        requester = ?request.user_id,
        "tutor reply sent"
    );
    Ok(Json(TutorResponse {
        response: reply,
        success: true,
    }))
}

/// Audit writes never affect the response; a failure is only logged.
async fn record_best_effort(sink: &dyn AuditSink, entry: &AuditLogEntry) {
    if let Err(err) = sink.record(entry).await {
        tracing::warn!(
            event = "audit.write.failed",
            sink = sink.name(),
            id = %entry.id,
            error = %err,
            "failed to write audit entry"
        );
    }
}
