//! CLI output formatting for both pipeline stages.
//!
//! Each entity is shown by its semantic identity first (index and title),
//! with source files as indented context lines.
//!
//! # Output Format
//!
//! ## Scan (`check`)
//!
//! ```text
//! Categories
//! 001 Billing (1 article)
//!     Source: billing.html
//!     001 Managing Invoices
//!         Source: invoices.html → billing/managing-invoices.md
//! 002 Uncategorized (1 article)
//!     001 Untitled Page
//!         Source: untitled-page.html → uncategorized/untitled-page.md
//!
//! Skipped
//!     page-title-only.html: no content found
//! ```
//!
//! ## Generate (`convert`)
//!
//! ```text
//! Converted: Managing Invoices → billing/managing-invoices.md
//! Skipped: page-title-only.html (no content found)
//! Error processing broken.html: stream did not contain valid UTF-8
//! Converted 1 articles (1 skipped, 1 failed)
//! ```
//!
//! Format functions are pure and return lines; `print_*` wrappers write them
//! to stdout.

use crate::config::Layout;
use crate::generate::article_path;
use crate::scan::Manifest;
use crate::types::{Outcome, RunSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "article" } else { "articles" }
}

/// Format an entity header: index + title + article count.
fn entity_header(index: usize, title: &str, count: usize) -> String {
    format!("{} {} ({} {})", format_index(index), title, count, plural(count))
}

fn push_article_lines(lines: &mut Vec<String>, manifest: &Manifest, depth: usize, indices: &[usize]) {
    for (pos, &i) in indices.iter().enumerate() {
        let Some(article) = manifest.articles.get(i) else {
            continue;
        };
        lines.push(format!(
            "{}{} {}",
            indent(depth),
            format_index(pos + 1),
            article.title
        ));
        lines.push(format!(
            "{}Source: {} → {}",
            indent(depth + 1),
            article.source,
            article_path(&manifest.categories, article)
        ));
    }
}

/// Format the scan manifest as a tree of categories (or a flat article list).
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    match manifest.layout {
        Layout::Categorized => {
            lines.push("Categories".to_string());
            for (pos, category) in manifest.categories.iter().enumerate() {
                lines.push(entity_header(pos + 1, &category.title, category.articles.len()));
                if category.id != crate::types::UNCATEGORIZED_ID {
                    lines.push(format!("{}Source: {}.html", indent(1), category.id));
                }
                push_article_lines(&mut lines, manifest, 1, &category.articles);
            }
        }
        Layout::Flat => {
            lines.push("Articles".to_string());
            let all: Vec<usize> = (0..manifest.articles.len()).collect();
            push_article_lines(&mut lines, manifest, 0, &all);
        }
    }

    let problems: Vec<&Outcome> = manifest
        .outcomes
        .iter()
        .filter(|o| !matches!(o, Outcome::Converted { .. }))
        .collect();
    if !problems.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for outcome in problems {
            match outcome {
                Outcome::Skipped { source, reason } => {
                    lines.push(format!("{}{}: {}", indent(1), source, reason));
                }
                Outcome::Failed { source, error } => {
                    lines.push(format!("{}{}: error: {}", indent(1), source, error));
                }
                Outcome::Converted { .. } => {}
            }
        }
    }

    lines
}

/// One progress line per outcome.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Converted { title, path, .. } => format!("Converted: {} → {}", title, path),
        Outcome::Skipped { source, reason } => format!("Skipped: {} ({})", source, reason),
        Outcome::Failed { source, error } => format!("Error processing {}: {}", source, error),
    }
}

/// Closing line of a run, over scan and generate outcomes alike.
pub fn format_summary<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> String {
    RunSummary::from_outcomes(outcomes).to_string()
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

pub fn print_outcome(outcome: &Outcome) {
    println!("{}", format_outcome(outcome));
}

pub fn print_summary<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) {
    println!("{}", format_summary(outcomes));
}
