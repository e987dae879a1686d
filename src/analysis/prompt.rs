use super::schema::response_schema;
use crate::ingest::UploadedFile;
use serde_json::Value;
use std::fmt::Write as _;

pub const SYSTEM_INSTRUCTION: &str = "\
You are a senior analytics strategist for video creators. You receive one or more CSV \
exports from a video platform's analytics dashboard. The files are not labelled: work out \
what each file contains from its columns and rows, then analyze them together.

For every file, report its name and the purpose you inferred (for example content \
performance, audience retention, revenue, traffic sources, thumbnails and click-through \
rate, demographics).

Depending on which data is present, write focused sections:
- contentPerformance: which videos and formats perform best and worst, and why.
- audienceRetention: where viewers drop off, average view duration, returning viewers.
- revenueAnalysis: RPM/CPM trends, top earning content, revenue concentration.
- thumbnailAnalysis: impressions, click-through rate, and what separates strong thumbnails.
Leave a section out entirely when no file supports it. Never invent numbers.

combinedStrategicInsights must connect findings across files (for example how retention \
relates to revenue) and is always required.

recommendations: concrete, prioritized actions. Rate impact as High, Medium or Low and \
explain the expected effect in the description.

charts: produce 2 to 4 charts of the most important trends. Choose type bar, line or area. \
xAxisKey names the category field (such as date or video). dataKeys lists the series to \
plot. Each data point has a name (the category label) and a series array with one \
{key, value} entry per data key, where value is a plain number without units.

Write sections in Markdown. Respond only with JSON that matches the response schema.";

const CLOSING_DIRECTIVE: &str =
    "Analyze the files above and respond with the JSON analysis described in your instructions.";

/// Everything the model needs for one-shot analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub system_instruction: String,
    pub content: String,
    pub schema: Value,
}

impl AnalysisRequest {
    pub fn new(files: &[UploadedFile]) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            content: build_content_block(files),
            schema: response_schema(),
        }
    }
}

/// Label line that precedes the `index`-th (1-based) file.
pub fn file_delimiter(index: usize, name: &str) -> String {
    format!("--- FILE {index}: {name} ---")
}

/// Append every file, in order, under its delimiter line.
pub(crate) fn write_files(out: &mut String, files: &[UploadedFile]) {
    for (index, file) in files.iter().enumerate() {
        let _ = writeln!(out, "{}", file_delimiter(index + 1, file.name()));
        out.push_str(file.content());
        out.push_str("\n\n");
    }
}

/// Single user-content block: every file under its delimiter, then the
/// closing directive.
pub fn build_content_block(files: &[UploadedFile]) -> String {
    let capacity = files.iter().map(|f| f.content().len() + 64).sum::<usize>() + 128;
    let mut content = String::with_capacity(capacity);
    write_files(&mut content, files);
    content.push_str(CLOSING_DIRECTIVE);
    content
}
