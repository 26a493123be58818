//! crates/content_pipeline_core/src/thoughts.rs
//!
//! Reassembles an incremental token stream into ordered `StreamingThought` records.
//! A newline in the stream closes the thought in progress; a carriage return
//! before it is not part of the thought.

use crate::domain::StreamingThought;

/// Accumulates stream fragments into closed thoughts plus one open thought.
///
/// The open thought always carries the highest id, and closed thoughts never reopen.
#[derive(Debug, Default, Clone)]
pub struct ThoughtAssembler {
    closed: Vec<StreamingThought>,
    open: String,
}

impl ThoughtAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment of the stream.
    pub fn push_fragment(&mut self, fragment: &str) {
        let mut segments = fragment.split('\n');
        // `split` always yields at least one segment.
        let head = segments.next().unwrap_or_default();
        self.open.push_str(head);

        let rest: Vec<&str> = segments.collect();
        let Some((tail, middle)) = rest.split_last() else {
            return;
        };

        let finished = std::mem::take(&mut self.open);
        self.close(finished);
        for segment in middle {
            self.close(segment.to_string());
        }
        self.open = tail.to_string();
    }

    /// The closed thoughts followed by the one in progress.
    pub fn snapshot(&self) -> Vec<StreamingThought> {
        let mut thoughts = self.closed.clone();
        thoughts.push(StreamingThought {
            id: StreamingThought::id_for(self.closed.len() + 1),
            content: self.open.trim_end_matches('\r').to_string(),
            is_complete: false,
        });
        thoughts
    }

    /// Ends the stream, forcing the open thought complete.
    ///
    /// An empty open thought left behind by a trailing newline is dropped,
    /// unless the stream produced nothing at all.
    pub fn finish(mut self) -> Vec<StreamingThought> {
        let last = std::mem::take(&mut self.open);
        if !last.trim_end_matches('\r').is_empty() || self.closed.is_empty() {
            self.close(last);
        }
        self.closed
    }

    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    fn close(&mut self, mut content: String) {
        let id = StreamingThought::id_for(self.closed.len() + 1);
        if content.ends_with('\r') {
            content.pop();
        }
        self.closed.push(StreamingThought {
            id,
            content,
            is_complete: true,
        });
    }
}
