pub mod normalize;
pub mod prompt;
pub mod schema;
pub mod types;

pub use normalize::{flatten_charts, normalize_response};
pub use prompt::{AnalysisRequest, SYSTEM_INSTRUCTION, build_content_block, file_delimiter};
pub use schema::{REQUIRED_FIELDS, response_schema};
pub use types::{
    AnalysisResult, AnalysisSummary, ChartKind, ChartRow, ChartSpec, DetectedFile, Impact,
    Recommendation,
};
