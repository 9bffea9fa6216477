use crate::session::{RenderSink, ViewModel};
use crate::span::{Category, IssueSpan};
use crate::stats::Statistics;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const SNIPPET_RADIUS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonIssue<'a> {
    index: usize,
    offset: usize,
    length: usize,
    category: Category,
    rule: &'a str,
    message: &'a str,
    text: &'a str,
    candidates: &'a [String],
    chosen: Option<&'a str>,
    skipped: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    issues: Vec<JsonIssue<'a>>,
    corrected: &'a str,
    stats: Statistics,
}

/// Prints the full report once per render. Used when there is no picker.
pub struct ReportRenderer {
    colored: bool,
    format: OutputFormat,
}

impl ReportRenderer {
    pub fn new(colored: bool, format: OutputFormat) -> Self {
        Self { colored, format }
    }
}

impl RenderSink for ReportRenderer {
    fn render(&mut self, view: &ViewModel<'_>) {
        print_report(view, self.colored, &self.format);
    }
}

/// Prints the corrected text to stderr after each change made in the picker,
/// keeping stdout for the final report.
pub struct PreviewRenderer {
    colored: bool,
}

impl PreviewRenderer {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl RenderSink for PreviewRenderer {
    fn render(&mut self, view: &ViewModel<'_>) {
        if self.colored {
            eprintln!("{} {}", "→".dimmed(), view.corrected.green());
        } else {
            eprintln!("→ {}", view.corrected);
        }
    }
}

pub fn print_report(view: &ViewModel<'_>, colored_output: bool, format: &OutputFormat) {
    match format {
        OutputFormat::Text => print_text_report(view, colored_output),
        OutputFormat::Json => print_json_report(view),
    }
}

fn print_text_report(view: &ViewModel<'_>, colored_output: bool) {
    if !view.has_issues() {
        if colored_output {
            println!("{}", "✓ No grammar issues found! Your text looks great.".green().bold());
        } else {
            println!("✓ No grammar issues found! Your text looks great.");
        }
        println!();
        print_stats(&view.stats, colored_output);
        return;
    }

    for span in view.issues {
        print_issue(span, view, colored_output);
    }

    println!();
    if colored_output {
        println!("{}", "Corrected text".bold().underline());
    } else {
        println!("Corrected text");
    }
    println!("{}", view.corrected);
    println!();
    print_stats(&view.stats, colored_output);
}

fn print_issue(span: &IssueSpan, view: &ViewModel<'_>, colored_output: bool) {
    let position = format!("{}:{}", span.offset(), span.length());
    let skipped = view.skipped.contains(&span.index());
    let context = if span.context().is_empty() {
        span.snippet(view.original, SNIPPET_RADIUS)
    } else {
        span.context().to_string()
    };

    if colored_output {
        println!(
            "\n{} {} {}",
            category_badge(span.category()),
            position.blue().bold(),
            span.message()
        );
        println!("    {} \"{}\"", "Context:".dimmed(), context.dimmed());
        match span.chosen() {
            Some(chosen) => println!(
                "    {} {} {}",
                "✓".green(),
                span.excerpt(view.original).red().strikethrough(),
                display_replacement(chosen).green().bold()
            ),
            None => println!("    {} kept as written", "·".dimmed()),
        }
        if skipped {
            println!("    {}", "overlaps another correction, not applied".yellow());
        }
    } else {
        println!(
            "\n[{}] {} {}",
            span.category().as_str().to_uppercase(),
            position,
            span.message()
        );
        println!("    Context: \"{}\"", context);
        match span.chosen() {
            Some(chosen) => println!(
                "    ✓ {} → {}",
                span.excerpt(view.original),
                display_replacement(chosen)
            ),
            None => println!("    · kept as written"),
        }
        if skipped {
            println!("    overlaps another correction, not applied");
        }
    }
}

fn print_json_report(view: &ViewModel<'_>) {
    let issues = view
        .issues
        .iter()
        .map(|span| JsonIssue {
            index: span.index(),
            offset: span.offset(),
            length: span.length(),
            category: span.category(),
            rule: span.rule_id(),
            message: span.message(),
            text: span.excerpt(view.original),
            candidates: span.candidates(),
            chosen: span.chosen(),
            skipped: view.skipped.contains(&span.index()),
        })
        .collect();

    let report = JsonReport {
        issues,
        corrected: view.corrected,
        stats: view.stats,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

pub fn print_stats(stats: &Statistics, colored_output: bool) {
    let rows = [
        ("Words", stats.words.to_string()),
        ("Characters", stats.characters.to_string()),
        ("Sentences", stats.sentences.to_string()),
        ("Vocabulary", format!("{}%", stats.vocabulary_ratio)),
        ("Reading time", stats.reading_time_label()),
    ];

    for (label, value) in rows {
        if colored_output {
            println!("  {:<13} {}", label.dimmed(), value.bold());
        } else {
            println!("  {:<13} {}", label, value);
        }
    }
}

pub fn category_badge(category: Category) -> ColoredString {
    let label = format!(" {} ", category.as_str().to_uppercase());
    match category {
        Category::Spelling => label.black().on_red(),
        Category::Grammar => label.black().on_yellow(),
        Category::Style => label.black().on_cyan(),
    }
}

/// Make deletions visible.
pub fn display_replacement(value: &str) -> String {
    if value.is_empty() {
        "(delete)".to_string()
    } else {
        format!("\"{}\"", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_display_replacement() {
        assert_eq!(display_replacement(""), "(delete)");
        assert_eq!(display_replacement("their"), "\"their\"");
    }
}
