pub mod report;
pub mod style;

pub use report::{render_chart, render_message, render_report};
