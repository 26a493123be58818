//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for live generation jobs. Every job gets its own id, so several jobs can run on one
//! connection and each can be cancelled independently.

use crate::pipeline::thoughts::ThoughtChainRequest;
use crate::pipeline::BatchProgress;
use content_pipeline_core::domain::{GeneratedQuestion, GenerationRequest, StreamingThought};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts a batched question generation job.
    GenerateQuestions { params: GenerationRequest },

    /// Starts a reasoning stream for a planned question set.
    GenerateThoughts { params: ThoughtChainRequest },

    /// Cancels a running job. Unknown or finished jobs are ignored.
    Cancel { job_id: Uuid },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Questions,
    Thoughts,
}

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Acknowledges a generation request and names its job.
    JobStarted { job_id: Uuid, kind: JobKind },

    /// The accumulated questions after another batch finished.
    QuestionsProgress {
        job_id: Uuid,
        questions: Vec<GeneratedQuestion>,
        progress: BatchProgress,
    },

    /// The full ordered thought list after another stream fragment.
    ThoughtsUpdate {
        job_id: Uuid,
        thoughts: Vec<StreamingThought>,
    },

    /// The job ran to completion.
    JobFinished { job_id: Uuid },

    /// The job stopped because the client cancelled it.
    JobCancelled { job_id: Uuid },

    /// Reports an error to the client, which should display an error message.
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        job_id: Option<Uuid>,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_pipeline_core::domain::QuestionType;

    #[test]
    fn generate_questions_message_parses_nested_params() {
        let json = r#"{"type": "generate_questions", "params": {"subject": "Economics", "topic": "Monetary Policy", "type": "mcq", "difficulty": "medium", "count": 3}}"#;
        match serde_json::from_str::<ClientMessage>(json).unwrap() {
            ClientMessage::GenerateQuestions { params } => {
                assert_eq!(params.question_type, QuestionType::Mcq);
                assert_eq!(params.count, 3);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn cancel_message_carries_the_job_id() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"type": "cancel", "job_id": "{}"}}"#, id);
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(&json).unwrap(),
            ClientMessage::Cancel { job_id } if job_id == id
        ));
    }

    #[test]
    fn server_messages_are_tagged() {
        let id = Uuid::nil();
        let json = serde_json::to_value(ServerMessage::JobStarted { job_id: id, kind: JobKind::Thoughts }).unwrap();
        assert_eq!(json["type"], "job_started");
        assert_eq!(json["kind"], "thoughts");

        let json = serde_json::to_value(ServerMessage::Error { job_id: None, message: "bad".into() }).unwrap();
        assert_eq!(json["type"], "error");
        assert!(json.get("job_id").is_none());
    }
}
