//! Response schema declared on every analysis call.
//!
//! Charts are requested in a nested per-point form (`{name, series: [{key,
//! value}]}`) because a model emits one entry per metric far more reliably
//! than an object with a dynamic set of fields. [`super::normalize`] turns
//! that back into flat rows.

use super::types::{ChartKind, Impact};
use serde_json::{Value, json};
use strum::VariantNames;

/// Fields the normalizer refuses to default.
pub const REQUIRED_FIELDS: [&str; 3] = [
    "filesDetected",
    "combinedStrategicInsights",
    "recommendations",
];

/// The structural output contract, in the schema dialect the Gemini API
/// accepts for `generationConfig.responseSchema`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "filesDetected": {
                "type": "ARRAY",
                "description": "Every uploaded file with the purpose inferred from its columns.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "purpose": { "type": "STRING" }
                    },
                    "required": ["name", "purpose"]
                }
            },
            "contentPerformance": {
                "type": "STRING",
                "description": "Markdown analysis of content performance, if such data was provided."
            },
            "audienceRetention": {
                "type": "STRING",
                "description": "Markdown analysis of audience retention, if such data was provided."
            },
            "revenueAnalysis": {
                "type": "STRING",
                "description": "Markdown analysis of revenue, if such data was provided."
            },
            "thumbnailAnalysis": {
                "type": "STRING",
                "description": "Markdown analysis of thumbnails and click-through rate, if such data was provided."
            },
            "combinedStrategicInsights": {
                "type": "STRING",
                "description": "Markdown synthesis that connects findings across all files."
            },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "action": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": Impact::VARIANTS },
                        "description": { "type": "STRING" }
                    },
                    "required": ["action", "impact", "description"]
                }
            },
            "charts": {
                "type": "ARRAY",
                "description": "Between 2 and 4 charts that visualize the most important trends.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "type": { "type": "STRING", "enum": ChartKind::VARIANTS },
                        "xAxisKey": {
                            "type": "STRING",
                            "description": "Field name that holds the category label of each point."
                        },
                        "dataKeys": {
                            "type": "ARRAY",
                            "description": "Series keys to plot, in display order.",
                            "items": { "type": "STRING" }
                        },
                        "data": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": {
                                        "type": "STRING",
                                        "description": "Category label, e.g. a date or a video title."
                                    },
                                    "series": {
                                        "type": "ARRAY",
                                        "description": "One entry per data key present at this point.",
                                        "items": {
                                            "type": "OBJECT",
                                            "properties": {
                                                "key": { "type": "STRING" },
                                                "value": { "type": "NUMBER" }
                                            },
                                            "required": ["key", "value"]
                                        }
                                    }
                                },
                                "required": ["name", "series"]
                            }
                        }
                    },
                    "required": ["title", "type", "xAxisKey", "dataKeys", "data"]
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}
