//! services/api/src/bin/api.rs

use api_lib::{
    config::Config,
    error::ApiError,
    pipeline::ContentPipeline,
    web::{
        analyze_exam_handler, generate_faqs_handler, generate_questions_handler, health_handler,
        rest::ApiDoc, state::AppState, ws_handler,
    },
};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the Pipeline ---
    let pipeline = ContentPipeline::from_config(&config);
    if pipeline.is_live() {
        info!(
            "Model backend configured (questions: {}, thoughts: {}, analysis: {}).",
            config.question_model, config.thought_model, config.analysis_model
        );
    } else {
        warn!(
            "OPENAI_API_KEY is not set. Running in demo mode with simulated output ({:?} to {:?} latency).",
            config.demo_delay_min, config.demo_delay_max
        );
    }

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), pipeline));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|source| ApiError::CorsOrigin {
            origin: config.cors_origin.clone(),
            source,
        })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/questions", post(generate_questions_handler))
        .route("/exam-analysis", post(analyze_exam_handler))
        .route("/faqs", post(generate_faqs_handler))
        .route("/ws", get(ws_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
