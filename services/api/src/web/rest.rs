//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::pipeline::faqs::DEFAULT_FAQ_COUNT;
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use content_pipeline_core::domain::{
    Difficulty, ExamAnalysisResult, Faq, GeneratedQuestion, GenerationRequest, QuestionType,
};
use content_pipeline_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate_questions_handler,
        analyze_exam_handler,
        generate_faqs_handler,
    ),
    components(
        schemas(
            HealthResponse,
            GenerateQuestionsPayload,
            QuestionsResponse,
            ExamAnalysisPayload,
            ExamAnalysisResponse,
            GenerateFaqsPayload,
            FaqsResponse,
        )
    ),
    tags(
        (name = "Content Pipeline API", description = "AI generation of exam questions, reasoning, grading reports and FAQs.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    /// `live` when a model backend is configured, `demo` otherwise.
    mode: &'static str,
}

/// The parameters of a question generation request.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsPayload {
    subject: String,
    topic: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "mcq")]
    question_type: QuestionType,
    #[schema(value_type = String, example = "medium")]
    difficulty: Difficulty,
    #[schema(example = 5)]
    count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct QuestionsResponse {
    #[schema(value_type = Vec<Object>)]
    questions: Vec<GeneratedQuestion>,
    mode: &'static str,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalysisPayload {
    /// The answer text extracted from the student's paper.
    text: String,
    subject: String,
    #[schema(example = 100)]
    total_marks: u32,
}

#[derive(Serialize, ToSchema)]
pub struct ExamAnalysisResponse {
    #[schema(value_type = Object)]
    analysis: ExamAnalysisResult,
    mode: &'static str,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateFaqsPayload {
    subject: String,
    topic: String,
    count: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct FaqsResponse {
    #[schema(value_type = Vec<Object>)]
    faqs: Vec<Faq>,
    mode: &'static str,
}

/// Maps a pipeline error onto an HTTP status and message.
fn port_error_response(e: PortError) -> (StatusCode, String) {
    let status = match &e {
        PortError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        PortError::Transport(_) | PortError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Report service health and whether the pipeline runs against a live backend.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: app_state.mode(),
    })
}

/// Generate a full question set.
///
/// Questions are produced in batches of three; malformed model output is replaced by
/// placeholder questions, so a valid request always yields exactly `count` questions.
/// Use the WebSocket endpoint to observe batches as they complete.
#[utoipa::path(
    post,
    path = "/questions",
    request_body = GenerateQuestionsPayload,
    responses(
        (status = 200, description = "Questions generated", body = QuestionsResponse),
        (status = 400, description = "Invalid parameters, including a count above the per-call limit")
    )
)]
pub async fn generate_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateQuestionsPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = GenerationRequest::new(
        payload.subject,
        payload.topic,
        payload.question_type,
        payload.difficulty,
        payload.count,
    );

    let questions = app_state
        .pipeline
        .generate_questions_batched(&request, |_, _| {}, &CancellationToken::new())
        .await
        .map_err(port_error_response)?;

    Ok(Json(QuestionsResponse {
        questions,
        mode: app_state.mode(),
    }))
}

/// Grade an exam paper.
///
/// Unlike generation, an unusable grading report is an error (502) and the client
/// should offer a retry.
#[utoipa::path(
    post,
    path = "/exam-analysis",
    request_body = ExamAnalysisPayload,
    responses(
        (status = 200, description = "Paper analysed", body = ExamAnalysisResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 502, description = "The model backend failed or returned an unusable report")
    )
)]
pub async fn analyze_exam_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ExamAnalysisPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let analysis = app_state
        .pipeline
        .analyze_exam_paper(&payload.text, &payload.subject, payload.total_marks)
        .await
        .map_err(|e| {
            error!("Exam analysis failed: {}", e);
            port_error_response(e)
        })?;

    Ok(Json(ExamAnalysisResponse {
        analysis,
        mode: app_state.mode(),
    }))
}

/// Generate frequently asked questions for a topic.
#[utoipa::path(
    post,
    path = "/faqs",
    request_body = GenerateFaqsPayload,
    responses(
        (status = 200, description = "FAQs generated", body = FaqsResponse),
        (status = 400, description = "Invalid parameters")
    )
)]
pub async fn generate_faqs_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateFaqsPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let faqs = app_state
        .pipeline
        .generate_faqs(
            &payload.subject,
            &payload.topic,
            payload.count.unwrap_or(DEFAULT_FAQ_COUNT),
        )
        .await
        .map_err(port_error_response)?;

    Ok(Json(FaqsResponse {
        faqs,
        mode: app_state.mode(),
    }))
}
