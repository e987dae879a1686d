use super::seed::{CHAT_SYSTEM_INSTRUCTION, WELCOME_MESSAGE, build_seed_message};
use super::turn::{ChatEvent, ChatState, Transition};
use crate::analysis::AnalysisResult;
use crate::error::{AppError, ChatError, Result};
use crate::ingest::UploadedFile;
use crate::llm::{ChatSession, Provider, StreamEvent, StreamSink};
use futures_util::StreamExt;

/// How a call to [`ChatDriver::send`] ended.
#[derive(Debug)]
pub enum TurnOutcome {
    Completed,
    /// Rejected without contacting the model (busy or blank input).
    Ignored,
    /// The failure notice was appended; the session is still usable.
    Failed(AppError),
}

/// A seeded chat session and its visible transcript.
pub struct ChatDriver {
    session: Box<dyn ChatSession>,
    state: ChatState,
}

impl ChatDriver {
    /// Open a session and send the seed, waiting for the model to accept it.
    /// This is the only way to get a driver, so no user message can reach an
    /// unseeded session.
    pub async fn open(
        provider: &dyn Provider,
        files: &[UploadedFile],
        result: &AnalysisResult,
    ) -> Result<Self> {
        let seed = build_seed_message(files, result)?;
        let mut session = provider.start_chat(CHAT_SYSTEM_INSTRUCTION);
        session.initialize(&seed).await?;
        tracing::debug!(files = files.len(), "chat session seeded");
        Ok(Self {
            session,
            state: ChatState::with_welcome(WELCOME_MESSAGE),
        })
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Run one user turn, forwarding every stream event to `sink`.
    pub async fn send(&mut self, text: &str, sink: &dyn StreamSink) -> TurnOutcome {
        if self.dispatch(ChatEvent::UserSent(text.to_string())) == Transition::Ignored {
            return TurnOutcome::Ignored;
        }

        let mut stream = match self.session.send(text).await {
            Ok(stream) => stream,
            Err(err) => return self.fail(err),
        };

        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(event) => event,
                Err(err) => return self.fail(err),
            };
            sink.on_event(&event).await;
            match event {
                StreamEvent::TextDelta { text } => {
                    self.dispatch(ChatEvent::Fragment(text));
                }
                StreamEvent::Done { .. } => {
                    self.dispatch(ChatEvent::Completed);
                    return TurnOutcome::Completed;
                }
                StreamEvent::ResponseStart { .. } => {}
            }
        }
        self.fail(ChatError::Incomplete.into())
    }

    fn dispatch(&mut self, event: ChatEvent) -> Transition {
        let (state, transition) = std::mem::take(&mut self.state).apply(event);
        self.state = state;
        transition
    }

    fn fail(&mut self, err: AppError) -> TurnOutcome {
        tracing::warn!(error = %err, "chat turn failed");
        self.dispatch(ChatEvent::Failed);
        TurnOutcome::Failed(err)
    }
}
