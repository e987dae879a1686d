//! Terminal rendering of an analysis result.

use super::style;
use crate::analysis::{AnalysisResult, ChartRow, ChartSpec};
use crate::chat::{ChatMessage, ChatRole};
use serde_json::Value;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 40;
const BAR: char = '█';

pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    section(&mut out, "Files Detected");
    for file in &result.files_detected {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            style::accent("•"),
            style::value(&file.name),
            file.purpose
        );
    }

    for (heading, body) in result.narrative_sections() {
        section(&mut out, heading);
        let _ = writeln!(out, "{}", indent(body));
    }

    section(&mut out, "Strategic Insights");
    let _ = writeln!(out, "{}", indent(&result.combined_strategic_insights));

    section(&mut out, "Recommendations");
    for (index, rec) in result.recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} {}",
            index + 1,
            style::impact(rec.impact),
            style::header(&rec.action)
        );
        let _ = writeln!(out, "     {}", rec.description);
    }

    for chart in result.charts() {
        out.push('\n');
        out.push_str(&render_chart(chart));
    }
    out
}

/// One horizontal bar table per series, scaled to the series maximum.
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        style::header(&chart.title),
        style::dim(format!("({} chart)", chart.kind))
    );

    let labels: Vec<String> = chart.data.iter().map(|row| label_text(chart, row)).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for key in &chart.data_keys {
        let _ = writeln!(out, "  {}", style::cyan(key));
        let values: Vec<Option<f64>> = chart
            .data
            .iter()
            .map(|row| ChartSpec::value(row, key))
            .collect();
        let max = values.iter().flatten().copied().fold(0.0_f64, f64::max);

        for (label, value) in labels.iter().zip(&values) {
            let cell = match value {
                Some(v) => format!(
                    "{} {}",
                    style::cyan(bar(*v, max)),
                    format_number(*v)
                ),
                None => style::dim("n/a"),
            };
            let _ = writeln!(out, "    {label:<label_width$} │ {cell}");
        }
    }
    out
}

/// Transcript line for a settled chat message.
pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!("{} {}", style::accent("you ›"), message.text),
        ChatRole::Model => format!("{} {}", style::accent("vidlytics ›"), message.text),
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", style::header(title));
    let _ = writeln!(out, "{}", style::dim("─".repeat(title.chars().count())));
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn label_text(chart: &ChartSpec, row: &ChartRow) -> String {
    match row.get(&chart.x_axis_key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    BAR.to_string().repeat(len.max(1))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
