#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use vidlytics::analysis::AnalysisRequest;
use vidlytics::error::{LlmError, Result};
use vidlytics::llm::{ChatSession, Provider, ProviderStream, StopReason, StreamEvent};

/// What the fake returns for the next analysis call.
pub enum AnalysisReply {
    Text(String),
    Fail(String),
}

/// Everything the fake model was asked to do, in order.
#[derive(Debug, Default)]
pub struct ModelLog {
    pub analysis_contents: Vec<String>,
    pub system_instructions: Vec<String>,
    pub seeds: Vec<String>,
    pub sent: Vec<String>,
}

type Script = Vec<Result<StreamEvent>>;

/// In-process stand-in for the hosted model. No network access.
#[derive(Default)]
pub struct FakeModel {
    analysis: Mutex<VecDeque<AnalysisReply>>,
    replies: Arc<Mutex<VecDeque<Script>>>,
    pub log: Arc<Mutex<ModelLog>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(self, reply: AnalysisReply) -> Self {
        self.analysis.lock().unwrap().push_back(reply);
        self
    }

    /// Queue one streamed reply made of `fragments`, finished with `Done`.
    pub fn with_reply(self, fragments: &[&str]) -> Self {
        let mut script: Script = fragments
            .iter()
            .map(|text| {
                Ok(StreamEvent::TextDelta {
                    text: (*text).to_string(),
                })
            })
            .collect();
        script.push(Ok(done()));
        self.with_script(script)
    }

    /// Queue a reply that never signals the end of the turn.
    pub fn with_unfinished_reply(self, fragments: &[&str]) -> Self {
        let script: Script = fragments
            .iter()
            .map(|text| {
                Ok(StreamEvent::TextDelta {
                    text: (*text).to_string(),
                })
            })
            .collect();
        self.with_script(script)
    }

    pub fn with_script(self, script: Script) -> Self {
        self.replies.lock().unwrap().push_back(script);
        self
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, ModelLog> {
        self.log.lock().unwrap()
    }
}

pub fn done() -> StreamEvent {
    StreamEvent::Done {
        stop_reason: Some(StopReason::EndTurn),
        input_tokens: None,
        output_tokens: None,
    }
}

impl Provider for FakeModel {
    fn name(&self) -> &str {
        "fake"
    }

    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.log()
                .analysis_contents
                .push(request.content.clone());
            let reply = self.analysis.lock().unwrap().pop_front();
            match reply {
                Some(AnalysisReply::Text(text)) => Ok(text),
                Some(AnalysisReply::Fail(message)) => Err(LlmError::Request {
                    provider: "fake".into(),
                    message,
                }
                .into()),
                None => Err(LlmError::EmptyResponse {
                    provider: "fake".into(),
                }
                .into()),
            }
        })
    }

    fn start_chat(&self, system_instruction: &str) -> Box<dyn ChatSession> {
        self.log()
            .system_instructions
            .push(system_instruction.to_string());
        Box::new(FakeSession {
            replies: Arc::clone(&self.replies),
            log: Arc::clone(&self.log),
        })
    }
}

struct FakeSession {
    replies: Arc<Mutex<VecDeque<Script>>>,
    log: Arc<Mutex<ModelLog>>,
}

impl ChatSession for FakeSession {
    fn initialize<'a>(
        &'a mut self,
        seed: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.log.lock().unwrap().seeds.push(seed.to_string());
            Ok(())
        })
    }

    fn send<'a>(
        &'a mut self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderStream>> + Send + 'a>> {
        Box::pin(async move {
            self.log.lock().unwrap().sent.push(text.to_string());
            let script = self.replies.lock().unwrap().pop_front().unwrap_or_default();
            let stream: ProviderStream = Box::pin(futures_util::stream::iter(script));
            Ok(stream)
        })
    }
}
