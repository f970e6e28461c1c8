//! Terminal rendering for playground reports and tutorial feedback
pub mod formats;

use crate::error::Result;
use crate::matcher::Truncation;
use crate::playground::PlaygroundReport;
use crate::tutorial::Feedback;
use clap::ValueEnum;
use colored::*;
use std::fmt;

pub use formats::{JsonFormatter, TextFormatter};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub use_color: bool,
    pub show_positions: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            use_color: false,
            show_positions: true,
        }
    }
}

/// Trait for report formatters
pub trait ReportFormatter {
    fn format(&self, report: &PlaygroundReport, text: &str) -> Result<String>;
    fn name(&self) -> &str;
}

pub fn formatter_for(format: OutputFormat, options: DisplayOptions) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(options)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

/// Marks each `(start, end)` byte span of `text`.
///
/// Spans must be ordered and non-overlapping; anything else is left unmarked.
pub fn highlight(text: &str, spans: &[(usize, usize)], use_color: bool) -> String {
    let mut output = String::with_capacity(text.len() + spans.len() * 2);
    let mut last = 0;

    for &(start, end) in spans {
        if start < last || end > text.len() || start >= end {
            continue;
        }
        let (Some(before), Some(matched)) = (text.get(last..start), text.get(start..end)) else {
            continue;
        };
        output.push_str(before);
        if use_color {
            output.push_str(&matched.yellow().bold().to_string());
        } else {
            output.push('[');
            output.push_str(matched);
            output.push(']');
        }
        last = end;
    }

    output.push_str(&text[last..]);
    output
}

pub fn describe_truncation(truncation: Truncation) -> &'static str {
    match truncation {
        Truncation::Iterations => "stopped after the iteration limit",
        Truncation::Matches => "showing the first matches only",
        Truncation::Backtracking => "stopped: pattern backtracks too much",
    }
}

pub fn render_feedback(feedback: &Feedback, use_color: bool) -> String {
    let message = feedback.to_string();
    if !use_color {
        return message;
    }
    match feedback {
        Feedback::Correct => message.green().bold().to_string(),
        Feedback::MatchedButWrong { .. } => message.yellow().to_string(),
        Feedback::NoMatch | Feedback::InvalidPattern { .. } => message.red().to_string(),
    }
}
