pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the handlers to make them easily accessible
// to the binary that will build the web server router.
pub use rest::{analyze_exam_handler, generate_faqs_handler, generate_questions_handler, health_handler};
pub use ws_handler::ws_handler;
