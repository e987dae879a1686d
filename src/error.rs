use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `vidlytics`.
///
/// Each pipeline stage defines its own error variant. Library callers can
/// match on these to pick the failure surface (retry screen vs. in-chat
/// notice); the binary keeps using `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── File ingestion ──────────────────────────────────────────────────
    #[error("ingest: {0}")]
    Ingest(#[from] IngestError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Response normalization ──────────────────────────────────────────
    #[error("analysis: {0}")]
    Analysis(#[from] AnalysisError),

    // ── Chat ────────────────────────────────────────────────────────────
    #[error("chat: {0}")]
    Chat(#[from] ChatError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "API key not found. Set GEMINI_API_KEY (or VIDLYTICS_API_KEY) in the environment, \
         or add api_key to ~/.vidlytics/config.toml"
    )]
    MissingApiKey,

    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Ingestion errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is not valid UTF-8 text (invalid byte at offset {offset})")]
    Encoding { name: String, offset: usize },

    #[error("no files selected")]
    Empty,
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("provider {provider} returned no candidates")]
    EmptyResponse { provider: String },

    #[error("streaming error: {0}")]
    Streaming(String),
}

// ─── Analysis (response normalization) errors ───────────────────────────────

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model output is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("model output does not match the response schema: {0}")]
    Schema(String),
}

// ─── Chat errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat session could not be seeded: {0}")]
    Seed(String),

    #[error("model turn ended without an end-of-turn signal")]
    Incomplete,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, AppError>;
