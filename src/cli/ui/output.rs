use console::{StyledObject, style};

use crate::types::{FeedbackResponse, Issue, Severity};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn feedback(&self, response: &FeedbackResponse) {
        print!("{}", render_feedback(response));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_label(severity: Severity) -> StyledObject<String> {
    let label = format!("{:<7}", severity.to_string());
    match severity {
        Severity::Error => style(label).red().bold(),
        Severity::Warning => style(label).yellow(),
        Severity::Info => style(label).blue(),
    }
}

fn render_issue(index: usize, issue: &Issue) -> String {
    format!(
        "{:>2}. {} {}\n    {}\n    {} {}\n",
        index + 1,
        severity_label(issue.severity),
        style(&issue.json_path).cyan(),
        issue.message,
        style("→").dim(),
        issue.suggestion
    )
}

/// Human-readable rendering of a feedback response
pub fn render_feedback(response: &FeedbackResponse) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", style("Summary").bold().underlined()));
    out.push_str(&format!("{}\n", response.summary));

    out.push_str(&format!(
        "\n{} ({})\n{}\n",
        style("Issues").bold(),
        response.issues.len(),
        "─".repeat(40)
    ));
    if response.issues.is_empty() {
        out.push_str(&format!("{}\n", style("No issues reported.").dim()));
    }
    for (index, issue) in response.issues.iter().enumerate() {
        out.push_str(&render_issue(index, issue));
    }

    out.push_str(&format!(
        "\n{}\n{}\n{}\n",
        style("Improved configuration").bold(),
        "─".repeat(40),
        pretty_document(&response.improved_renovate_json)
    ));

    out
}

/// Pretty-print JSON text, leaving anything unparseable untouched
fn pretty_document(document: &str) -> String {
    serde_json::from_str::<serde_json::Value>(document)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| document.to_string())
}
