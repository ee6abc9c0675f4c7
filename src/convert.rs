//! HTML fragment → Markdown conversion.
//!
//! Rendering is done by [htmd](https://docs.rs/htmd) with a fixed option set:
//! links, images, emphasis and tables are kept, headings are ATX, code blocks
//! are fenced, and lines are never hard-wrapped. The only post-processing is
//! blank-line normalization: a run of three or more newlines collapses to
//! exactly two, so blocks are separated by at most one blank line.

use htmd::HtmlToMarkdown;
use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("BUG: hardcoded newline regex is invalid"));

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Markdown rendering failed: {0}")]
    Htmd(#[from] std::io::Error),
}

/// A configured htmd converter. Build once per run and reuse for every article.
pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            bullet_list_marker: BulletListMarker::Dash,
            ..Default::default()
        };
        Self {
            inner: HtmlToMarkdown::builder()
                .options(options)
                .skip_tags(vec!["script", "style", "noscript"])
                .build(),
        }
    }

    /// Convert an HTML fragment to Markdown.
    pub fn convert(&self, html: &str) -> Result<String, ConvertError> {
        let markdown = self.inner.convert(html)?;
        Ok(collapse_blank_lines(&markdown))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert with a one-off converter.
pub fn html_to_markdown(html: &str) -> Result<String, ConvertError> {
    MarkdownConverter::new().convert(html)
}

/// Collapse runs of 3+ newlines to two and drop leading newlines.
pub fn collapse_blank_lines(markdown: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(markdown, "\n\n")
        .trim_start_matches('\n')
        .to_string()
}
