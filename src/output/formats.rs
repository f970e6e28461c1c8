//! Individual output format implementations
use super::{DisplayOptions, ReportFormatter, describe_truncation, highlight};
use crate::error::Result;
use crate::playground::PlaygroundReport;
use colored::*;

/// Text formatter (default)
pub struct TextFormatter {
    options: DisplayOptions,
}

impl TextFormatter {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &PlaygroundReport, text: &str) -> Result<String> {
        let mut output = String::new();
        let use_color = self.options.use_color;

        output.push_str(&format!("Pattern: /{}/{}\n", report.pattern, report.flags));

        if let Some(error) = &report.error {
            let line = format!("Error: {error}");
            if use_color {
                output.push_str(&line.red().to_string());
            } else {
                output.push_str(&line);
            }
            output.push('\n');
            return Ok(output);
        }

        let spans: Vec<(usize, usize)> = report.matches.iter().map(|m| (m.index, m.end)).collect();
        output.push_str(&highlight(text, &spans, use_color));
        output.push_str("\n\n");

        if report.matches.is_empty() {
            let line = "No matches found";
            if use_color {
                output.push_str(&line.yellow().to_string());
            } else {
                output.push_str(line);
            }
            output.push('\n');
            return Ok(output);
        }

        output.push_str(&format!("Matches: {}", report.matches.len()));
        if let Some(truncation) = report.truncation {
            output.push_str(&format!(" ({})", describe_truncation(truncation)));
        }
        output.push('\n');

        for (i, m) in report.matches.iter().enumerate() {
            if self.options.show_positions {
                output.push_str(&format!("  {}. {:?} at {}..{}\n", i + 1, m.text, m.index, m.end));
            } else {
                output.push_str(&format!("  {}. {:?}\n", i + 1, m.text));
            }
            for (g, group) in m.groups.iter().enumerate() {
                match group {
                    Some(value) => output.push_str(&format!("     group {}: {value:?}\n", g + 1)),
                    None => output.push_str(&format!("     group {}: (no match)\n", g + 1)),
                }
            }
            for (name, value) in &m.named_groups {
                match value {
                    Some(value) => output.push_str(&format!("     {name}: {value:?}\n")),
                    None => output.push_str(&format!("     {name}: (no match)\n")),
                }
            }
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &PlaygroundReport, _text: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn name(&self) -> &str {
        "json"
    }
}
