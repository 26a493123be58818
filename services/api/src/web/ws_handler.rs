//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each generation request becomes a job task that pushes partial results to the
//! client as they arrive; a single writer task owns the socket's sending half.

use crate::web::{
    protocol::{ClientMessage, JobKind, ServerMessage},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The cancellation tokens of the jobs still running on one connection.
type JobRegistry = Arc<Mutex<HashMap<Uuid, CancellationToken>>>;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established ({} mode).", app_state.mode());

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // --- 1. Writer Task ---
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                warn!("Failed to send message. Client may have disconnected.");
                break;
            }
        }
    });

    // --- 2. Main Message Loop ---
    let jobs: JobRegistry = Arc::new(Mutex::new(HashMap::new()));
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => handle_text_message(text.as_str(), &app_state, &jobs, &tx),
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- 3. Cleanup ---
    if let Ok(mut running) = jobs.lock() {
        for (job_id, token) in running.drain() {
            info!("Cancelling job {} on disconnect.", job_id);
            token.cancel();
        }
    }
    drop(tx);
    writer.abort();
    info!("WebSocket connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
fn handle_text_message(
    text: &str,
    app_state: &Arc<AppState>,
    jobs: &JobRegistry,
    tx: &UnboundedSender<ServerMessage>,
) {
    let client_msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            let _ = tx.send(ServerMessage::Error {
                job_id: None,
                message: format!("Unrecognised message: {}", e),
            });
            return;
        }
    };

    match client_msg {
        ClientMessage::GenerateQuestions { params } => {
            let (job_id, token) = register_job(jobs, tx, JobKind::Questions);
            let pipeline = app_state.pipeline.clone();
            let jobs = jobs.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let progress_tx = tx.clone();
                let result = pipeline
                    .generate_questions_batched(
                        &params,
                        |questions, progress| {
                            let _ = progress_tx.send(ServerMessage::QuestionsProgress {
                                job_id,
                                questions: questions.to_vec(),
                                progress,
                            });
                        },
                        &token,
                    )
                    .await;
                if let Err(e) = result {
                    error!("Question job {} failed: {}", job_id, e);
                    let _ = tx.send(ServerMessage::Error {
                        job_id: Some(job_id),
                        message: e.to_string(),
                    });
                }
                finish_job(&jobs, &tx, job_id, &token);
            });
        }
        ClientMessage::GenerateThoughts { params } => {
            let (job_id, token) = register_job(jobs, tx, JobKind::Thoughts);
            let pipeline = app_state.pipeline.clone();
            let jobs = jobs.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let update_tx = tx.clone();
                pipeline
                    .generate_thought_chain(
                        &params,
                        |thoughts| {
                            let _ = update_tx.send(ServerMessage::ThoughtsUpdate { job_id, thoughts });
                        },
                        &token,
                    )
                    .await;
                finish_job(&jobs, &tx, job_id, &token);
            });
        }
        ClientMessage::Cancel { job_id } => {
            let token = jobs.lock().ok().and_then(|running| running.get(&job_id).cloned());
            match token {
                Some(token) => {
                    info!("Cancel requested for job {}.", job_id);
                    token.cancel();
                }
                None => warn!("Cancel requested for unknown job {}.", job_id),
            }
        }
    }
}

fn register_job(
    jobs: &JobRegistry,
    tx: &UnboundedSender<ServerMessage>,
    kind: JobKind,
) -> (Uuid, CancellationToken) {
    let job_id = Uuid::new_v4();
    let token = CancellationToken::new();
    if let Ok(mut running) = jobs.lock() {
        running.insert(job_id, token.clone());
    }
    info!("Starting {:?} job {}.", kind, job_id);
    let _ = tx.send(ServerMessage::JobStarted { job_id, kind });
    (job_id, token)
}

fn finish_job(
    jobs: &JobRegistry,
    tx: &UnboundedSender<ServerMessage>,
    job_id: Uuid,
    token: &CancellationToken,
) {
    if let Ok(mut running) = jobs.lock() {
        running.remove(&job_id);
    }
    let msg = if token.is_cancelled() {
        ServerMessage::JobCancelled { job_id }
    } else {
        ServerMessage::JobFinished { job_id }
    };
    let _ = tx.send(msg);
}
