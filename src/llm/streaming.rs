use crate::error::Result;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;

/// Lazy, finite, non-restartable sequence of events for one model turn.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 'static>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Blocked,
    Other,
}

impl StopReason {
    /// Map a Gemini `finishReason` string.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "STOP" => Self::EndTurn,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => Self::Blocked,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamEvent {
    ResponseStart {
        model: Option<String>,
    },
    TextDelta {
        text: String,
    },
    /// End-of-turn signal. A stream that stops without one did not finish.
    Done {
        stop_reason: Option<StopReason>,
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    },
}

pub trait StreamSink: Send + Sync {
    fn on_event<'a>(
        &'a self,
        event: &'a StreamEvent,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

#[derive(Debug, Default)]
pub struct NullStreamSink;

impl StreamSink for NullStreamSink {
    fn on_event<'a>(
        &'a self,
        _event: &'a StreamEvent,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }
}

/// Writes text deltas to the terminal as they arrive.
pub struct CliStreamSink {
    writer: Arc<dyn Fn(&str) + Send + Sync>,
}

impl CliStreamSink {
    pub fn new() -> Self {
        Self {
            writer: Arc::new(|text| {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(text.as_bytes());
                let _ = stdout.flush();
            }),
        }
    }

    #[cfg(test)]
    fn with_writer(writer: Arc<dyn Fn(&str) + Send + Sync>) -> Self {
        Self { writer }
    }
}

impl Default for CliStreamSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSink for CliStreamSink {
    fn on_event<'a>(
        &'a self,
        event: &'a StreamEvent,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            match event {
                StreamEvent::TextDelta { text } => (self.writer)(text),
                StreamEvent::Done { .. } => (self.writer)("\n"),
                StreamEvent::ResponseStart { .. } => {}
            }
        })
    }
}
