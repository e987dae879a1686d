use crate::analysis::prompt::write_files;
use crate::analysis::{AnalysisResult, AnalysisSummary};
use crate::error::ChatError;
use crate::ingest::UploadedFile;

pub const CHAT_SYSTEM_INSTRUCTION: &str = "\
You are a YouTube analytics assistant. You have been given the channel's raw \
CSV exports and a summary of a strategic analysis of them. Answer follow-up \
questions using that data. Quote concrete numbers when they support the \
answer, say so plainly when the data cannot answer a question, and keep \
replies concise.";

/// First message the user sees. Written locally; the model's reply to the
/// seed is never shown.
pub const WELCOME_MESSAGE: &str = "I've read your files and the analysis above. \
Ask me anything about your channel's performance, such as why a video \
underperformed or what to publish next.";

const SEED_PREAMBLE: &str = "Here is the data for this conversation. \
The raw CSV files follow, then a summary of the analysis already shown to the user.\n\n";

const SUMMARY_HEADER: &str = "--- ANALYSIS SUMMARY ---";

const SEED_CLOSING: &str = "Acknowledge that you have received this data in one short \
sentence. Do not repeat or summarize the analysis.";

/// Build the one-time seed message for a chat session.
///
/// Files use the same delimiter format as the analysis request. Only the
/// combined insights, recommendations and detected files of the result are
/// included.
pub fn build_seed_message(
    files: &[UploadedFile],
    result: &AnalysisResult,
) -> Result<String, ChatError> {
    let summary = serde_json::to_string_pretty(&AnalysisSummary::from(result))
        .map_err(|err| ChatError::Seed(err.to_string()))?;

    let mut seed = String::from(SEED_PREAMBLE);
    write_files(&mut seed, files);
    seed.push_str(SUMMARY_HEADER);
    seed.push('\n');
    seed.push_str(&summary);
    seed.push_str("\n\n");
    seed.push_str(SEED_CLOSING);
    Ok(seed)
}
