use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat chart row: the x-axis field holds the category label, every other
/// field is a series key holding that series' value at this point.
pub type ChartRow = Map<String, Value>;

/// The normalized, typed result of one analysis call.
///
/// Replaced wholesale by the next analysis; never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub files_detected: Vec<DetectedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_retention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_analysis: Option<String>,
    pub combined_strategic_insights: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<ChartSpec>>,
}

impl AnalysisResult {
    /// Narrative sections that are present, paired with their headings.
    pub fn narrative_sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("Content Performance", self.content_performance.as_deref()),
            ("Audience Retention", self.audience_retention.as_deref()),
            ("Revenue Analysis", self.revenue_analysis.as_deref()),
            ("Thumbnails & CTR", self.thumbnail_analysis.as_deref()),
        ]
        .into_iter()
        .filter_map(|(heading, body)| body.map(|text| (heading, text)))
        .filter(|(_, text)| !text.trim().is_empty())
        .collect()
    }

    pub fn charts(&self) -> &[ChartSpec] {
        self.charts.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFile {
    pub name: String,
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub impact: Impact,
    pub description: String,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub x_axis_key: String,
    pub data_keys: Vec<String>,
    pub data: Vec<ChartRow>,
}

impl ChartSpec {
    /// Category label of a row, if the x-axis field is present.
    pub fn label<'a>(&self, row: &'a ChartRow) -> Option<&'a str> {
        row.get(&self.x_axis_key).and_then(Value::as_str)
    }

    /// Numeric value of `key` in `row`; `None` means "no value at this point".
    pub fn value(row: &ChartRow, key: &str) -> Option<f64> {
        row.get(key).and_then(Value::as_f64)
    }

    /// `(row index, series key)` pairs for series missing from a row.
    pub fn missing_series(&self) -> Vec<(usize, &str)> {
        self.data
            .iter()
            .enumerate()
            .flat_map(|(index, row)| {
                self.data_keys
                    .iter()
                    .filter(move |key| !row.contains_key(key.as_str()))
                    .map(move |key| (index, key.as_str()))
            })
            .collect()
    }
}

/// Condensed view of a result used to seed the chat session.
///
/// Narrative sections are left out to bound context size.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary<'a> {
    pub combined_strategic_insights: &'a str,
    pub recommendations: &'a [Recommendation],
    pub files_detected: &'a [DetectedFile],
}

impl<'a> From<&'a AnalysisResult> for AnalysisSummary<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Self {
            combined_strategic_insights: &result.combined_strategic_insights,
            recommendations: &result.recommendations,
            files_detected: &result.files_detected,
        }
    }
}
