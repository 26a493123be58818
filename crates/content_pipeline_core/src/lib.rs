pub mod analysis;
pub mod demo;
pub mod domain;
pub mod faq;
pub mod ports;
pub mod prompts;
pub mod sanitize;
pub mod thoughts;
pub mod validator;

pub use domain::{
    Difficulty, ExamAnalysisResult, Faq, GeneratedQuestion, GenerationRequest, KeywordAnalysis,
    QuestionAnalysis, QuestionType, StreamingThought,
};
pub use ports::{
    ChatMessage, CompletionRequest, CompletionService, PortError, PortResult, Role, TextStream,
};
pub use thoughts::ThoughtAssembler;
pub use validator::IdSeed;
