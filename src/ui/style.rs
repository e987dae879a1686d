use crate::analysis::Impact;
use console::style;
use std::fmt::Display;

/// Green bold: success checkmarks, confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// Red bold: failures
pub fn error<D: Display>(text: D) -> String {
    style(text).red().bold().to_string()
}

/// White bold: section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: secondary text, decorative lines, missing values
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings, truncation notes
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green: file names, confirmed values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold: bullets, speaker prefixes
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Cyan: field labels, chart bars
pub fn cyan<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}

/// Impact tag colored by severity.
pub fn impact(impact: Impact) -> String {
    let tag = format!("[{}]", impact.to_string().to_uppercase());
    match impact {
        Impact::High => style(tag).red().bold().to_string(),
        Impact::Medium => style(tag).yellow().bold().to_string(),
        Impact::Low => style(tag).green().to_string(),
    }
}
