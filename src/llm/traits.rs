use super::streaming::ProviderStream;
use crate::analysis::AnalysisRequest;
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;

/// Hosted model used for one-shot analysis and for opening chat sessions.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run the structured analysis call and return the raw JSON text.
    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Create a fresh, unseeded conversational session.
    fn start_chat(&self, system_instruction: &str) -> Box<dyn ChatSession>;
}

/// Opaque handle to one conversational context with the model.
pub trait ChatSession: Send {
    /// Send the seed message and wait until the model accepted it. The
    /// model's reply to the seed is not returned.
    fn initialize<'a>(
        &'a mut self,
        seed: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Send one user message and stream the model's reply.
    fn send<'a>(
        &'a mut self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderStream>> + Send + 'a>>;
}
