//! Turns the model's raw JSON into a typed [`AnalysisResult`], flattening
//! chart points on the way. This is the only place the nested series form
//! is converted; nothing downstream ever sees it.

use super::schema::REQUIRED_FIELDS;
use super::types::AnalysisResult;
use crate::error::AnalysisError;
use serde_json::{Map, Value};

/// Parse, validate and flatten a raw analysis response.
///
/// Fails on invalid JSON or a missing required field; required fields are
/// never default-filled.
pub fn normalize_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let mut value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| AnalysisError::InvalidJson(err.to_string()))?;

    let Some(fields) = value.as_object() else {
        return Err(AnalysisError::Schema(
            "top-level value is not an object".into(),
        ));
    };
    for field in REQUIRED_FIELDS {
        if fields.get(field).is_none_or(Value::is_null) {
            return Err(AnalysisError::MissingField(field));
        }
    }

    flatten_charts(&mut value);

    let result: AnalysisResult =
        serde_json::from_value(value).map_err(|err| AnalysisError::Schema(err.to_string()))?;

    for chart in result.charts() {
        let missing = chart.missing_series();
        if !missing.is_empty() {
            tracing::warn!(
                chart = %chart.title,
                missing = missing.len(),
                "chart rows lack some series values; those points render without them"
            );
        }
    }

    tracing::info!(
        files = result.files_detected.len(),
        recommendations = result.recommendations.len(),
        charts = result.charts().len(),
        "analysis normalized"
    );
    Ok(result)
}

/// Flatten the data points of every chart in a raw response, in place.
///
/// Idempotent: points without a `series` array, and flat rows that already
/// carry the x-axis key, are left untouched.
pub fn flatten_charts(response: &mut Value) {
    let Some(charts) = response.get_mut("charts").and_then(Value::as_array_mut) else {
        return;
    };
    for chart in charts {
        flatten_chart(chart);
    }
}

fn flatten_chart(chart: &mut Value) {
    let Some(chart) = chart.as_object_mut() else {
        return;
    };
    let x_axis_key = chart
        .get("xAxisKey")
        .and_then(Value::as_str)
        .unwrap_or("name")
        .to_owned();
    let Some(points) = chart.get_mut("data").and_then(Value::as_array_mut) else {
        return;
    };
    for point in points {
        if let Some(row) = flatten_point(point, &x_axis_key) {
            *point = Value::Object(row);
        }
    }
}

/// `{name, series: [{key, value}]}` → `{<x_axis_key>: name, <key>: value}`.
///
/// Returns `None` for points that are already flat.
fn flatten_point(point: &Value, x_axis_key: &str) -> Option<Map<String, Value>> {
    let point = point.as_object()?;
    let series = point.get("series")?.as_array()?;
    // A flat row whose data key happens to be named "series".
    if point.contains_key(x_axis_key) && !point.contains_key("name") {
        return None;
    }

    let label = point
        .get("name")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    let mut row = Map::new();
    row.insert(x_axis_key.to_owned(), label);

    for entry in series {
        let Some(key) = entry.get("key").and_then(Value::as_str) else {
            continue;
        };
        // The category label wins over a series that reuses its field name.
        if key == x_axis_key {
            continue;
        }
        if let Some(value) = entry.get("value").and_then(coerce_number) {
            row.insert(key.to_owned(), value);
        }
    }

    Some(row)
}

/// Numbers pass through; numeric strings are parsed; anything else is
/// treated as "no value".
fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

/// Accept output wrapped in a Markdown code fence.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
