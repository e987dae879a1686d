// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod scrub;
pub mod sse;
pub mod streaming;
pub mod traits;

// ── Provider implementations ────────────────────────────────────────────────
pub mod gemini;

// ── Re-exports ──────────────────────────────────────────────────────────────
pub use gemini::GeminiProvider;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use streaming::{
    CliStreamSink, NullStreamSink, ProviderStream, StopReason, StreamEvent, StreamSink,
};
pub use traits::{ChatSession, Provider};
