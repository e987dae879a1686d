//! Google Gemini provider.
//!
//! - One-shot analysis through `generateContent` with a declared
//!   `responseSchema` and `responseMimeType: application/json`.
//! - Chat sessions through `streamGenerateContent?alt=sse`, keeping the
//!   conversation history client-side.

use crate::analysis::AnalysisRequest;
use crate::config::Config;
use crate::error::{AppError, ConfigError, LlmError, Result};
use crate::llm::{
    scrub::sanitize_api_error,
    sse::{SseBuffer, parse_data_lines},
    streaming::{ProviderStream, StopReason, StreamEvent},
    traits::{ChatSession, Provider},
};
use futures_util::StreamExt;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

mod types;
use types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

const PROVIDER: &str = "gemini";
const JSON_MIME_TYPE: &str = "application/json";

/// Connection and generation settings shared by the provider and every chat
/// session it opens.
#[derive(Clone)]
struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    max_output_tokens: u32,
}

impl GeminiClient {
    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }

    /// The credential is checked on every call, never cached as "present".
    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::Config(ConfigError::MissingApiKey))
    }

    fn generation_config(&self, schema: Option<&serde_json::Value>) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            response_mime_type: schema.map(|_| JSON_MIME_TYPE),
            response_schema: schema.cloned(),
        }
    }

    async fn post(&self, action: &str, request: &GenerateContentRequest) -> Result<reqwest::Response> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}:{action}", self.base_url, self.model_path());

        tracing::debug!(model = %self.model, action, contents = request.contents.len(), "gemini request");

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| LlmError::Request {
                provider: PROVIDER.into(),
                message: sanitize_api_error(&err.to_string()),
            })?;

        Self::ensure_success_status(response).await
    }

    async fn ensure_success_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        Err(LlmError::Status {
            provider: PROVIDER.into(),
            status: status.as_u16(),
            message: sanitize_api_error(&message),
        }
        .into())
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self.post("generateContent", request).await?;
        let result: GenerateContentResponse =
            response.json().await.map_err(|err| LlmError::Request {
                provider: PROVIDER.into(),
                message: sanitize_api_error(&err.to_string()),
            })?;

        if let Some(err) = result.error.as_ref() {
            return Err(LlmError::Request {
                provider: PROVIDER.into(),
                message: sanitize_api_error(&err.message),
            }
            .into());
        }

        Ok(result)
    }

    fn extract_text(result: &GenerateContentResponse) -> Result<String> {
        if let Some(reason) = result
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(LlmError::Request {
                provider: PROVIDER.into(),
                message: format!("prompt blocked: {reason}"),
            }
            .into());
        }

        let text = result
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .map(types::Candidate::text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.into(),
            }
            .into());
        }

        Ok(text)
    }
}

/// Gemini-backed [`Provider`].
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client: GeminiClient {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                api_key: config.api_key.clone(),
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }

    fn analysis_request(&self, request: &AnalysisRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(request.content.as_str())],
            system_instruction: Some(Content::system(request.system_instruction.as_str())),
            generation_config: self.client.generation_config(Some(&request.schema)),
        }
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.analysis_request(request);
            tracing::debug!(chars = request.content.len(), "sending analysis request");
            let result = self.client.generate(&body).await?;
            if let Some(usage) = &result.usage_metadata {
                tracing::debug!(
                    input_tokens = usage.prompt_token_count,
                    output_tokens = usage.candidates_token_count,
                    model = result.model_version.as_deref().unwrap_or(&self.client.model),
                    "analysis response received"
                );
            }
            GeminiClient::extract_text(&result)
        })
    }

    fn start_chat(&self, system_instruction: &str) -> Box<dyn ChatSession> {
        Box::new(GeminiChatSession {
            client: self.client.clone(),
            system_instruction: Content::system(system_instruction),
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

/// Conversation held client-side; every send replays the history.
pub struct GeminiChatSession {
    client: GeminiClient,
    system_instruction: Content,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiChatSession {
    async fn request_with(&self, user: &Content) -> GenerateContentRequest {
        let mut contents = self.history.lock().await.clone();
        contents.push(user.clone());
        GenerateContentRequest {
            contents,
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: self.client.generation_config(None),
        }
    }
}

impl ChatSession for GeminiChatSession {
    fn initialize<'a>(
        &'a mut self,
        seed: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.client.api_key()?;
            let user = Content::user(seed);
            let request = self.request_with(&user).await;
            let result = self.client.generate(&request).await?;
            let ack = GeminiClient::extract_text(&result)?;
            tracing::debug!(chars = ack.len(), "chat seed acknowledged");

            let mut history = self.history.lock().await;
            history.push(user);
            history.push(Content::model(ack));
            Ok(())
        })
    }

    fn send<'a>(
        &'a mut self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderStream>> + Send + 'a>> {
        Box::pin(async move {
            let user = Content::user(text);
            let request = self.request_with(&user).await;
            let response = self
                .client
                .post("streamGenerateContent?alt=sse", &request)
                .await?;
            Ok(reply_stream(response, user, Arc::clone(&self.history)))
        })
    }
}

/// Decode the SSE body into stream events. The user turn and the model reply
/// are committed to `history` only once the end-of-turn signal arrives, so a
/// failed turn leaves the conversation as it was.
fn reply_stream(
    response: reqwest::Response,
    user: Content,
    history: Arc<Mutex<Vec<Content>>>,
) -> ProviderStream {
    let mut byte_stream = response.bytes_stream();

    let stream = async_stream::stream! {
        let mut sse = SseBuffer::new();
        let mut reply = String::new();
        let mut sent_start = false;
        let mut pending = Vec::new();
        let mut connection_open = true;

        while connection_open {
            match byte_stream.next().await {
                Some(Ok(chunk)) => sse.push_chunk(&chunk),
                Some(Err(err)) => {
                    yield Err(AppError::from(LlmError::Streaming(sanitize_api_error(&err.to_string()))));
                    return;
                }
                None => connection_open = false,
            }

            let mut blocks = Vec::new();
            while let Some(block) = sse.next_event_block() {
                blocks.push(block);
            }
            if !connection_open {
                blocks.extend(std::mem::take(&mut sse).finish());
            }

            for block in blocks {
                for data in parse_data_lines(&block) {
                    match decode_chunk(data, &mut sent_start) {
                        Ok(events) => pending.extend(events),
                        Err(err) => {
                            yield Err(err);
                            return;
                        }
                    }
                }
            }

            for event in pending.drain(..) {
                match &event {
                    StreamEvent::TextDelta { text } => reply.push_str(text),
                    StreamEvent::Done { .. } => {
                        let mut turns = history.lock().await;
                        turns.push(user.clone());
                        turns.push(Content::model(reply.as_str()));
                    }
                    StreamEvent::ResponseStart { .. } => {}
                }
                yield Ok(event);
            }
        }
    };

    Box::pin(stream)
}

/// One SSE `data:` payload → zero or more events.
fn decode_chunk(data: &str, sent_start: &mut bool) -> Result<Vec<StreamEvent>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let chunk = serde_json::from_str::<GenerateContentResponse>(data).map_err(|err| {
        tracing::warn!(error = %err, "undecodable stream payload");
        LlmError::Streaming(format!(
            "undecodable stream payload: {}",
            sanitize_api_error(data)
        ))
    })?;

    if let Some(err) = chunk.error.as_ref() {
        return Err(LlmError::Streaming(sanitize_api_error(&err.message)).into());
    }

    let mut events = Vec::new();
    if !*sent_start {
        events.push(StreamEvent::ResponseStart {
            model: chunk.model_version.clone(),
        });
        *sent_start = true;
    }

    for candidate in chunk.candidates.iter().flatten() {
        let text = candidate.text();
        if !text.is_empty() {
            events.push(StreamEvent::TextDelta { text });
        }

        if let Some(reason) = candidate.finish_reason.as_deref() {
            let (input_tokens, output_tokens) = chunk
                .usage_metadata
                .as_ref()
                .map_or((None, None), |usage| {
                    (
                        Some(usage.prompt_token_count),
                        Some(usage.candidates_token_count),
                    )
                });
            events.push(StreamEvent::Done {
                stop_reason: Some(StopReason::from_finish_reason(reason)),
                input_tokens,
                output_tokens,
            });
        }
    }

    Ok(events)
}
