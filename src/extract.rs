//! Title, content and category lookup on parsed HTML pages.
//!
//! Every lookup is an ordered list of candidates evaluated until one yields
//! something:
//!
//! ```text
//! Title:    <h1> text → <title> text → filename ("getting-started.html" → "Getting Started")
//! Content:  article → div.article-body → div.content → body   (configurable)
//! Category: first breadcrumb link whose href contains "/categories/"
//! ```
//!
//! The parser adds a `<body>` to every document, so a `body` candidate only
//! matches when the source itself has a `<body>` tag. A fragment like
//! `<h1>Bare</h1><p>x</p>` or an empty file has no content.
//!
//! Selectors from the config are compiled once into an [`Extractor`], which is
//! then reused for every page of the run.

use crate::config::{CategoriesConfig, ConfigError, ConvertConfig};
use crate::naming;
use crate::types::{Registry, UNCATEGORIZED_ID};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b").expect("BUG: hardcoded body tag regex is invalid"));

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid"));

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

/// A content selector, and whether it only counts when the source has a
/// literal `<body>` tag.
struct ContentCandidate {
    selector: Selector,
    needs_body_tag: bool,
}

/// Compiled selectors for one run.
pub struct Extractor {
    content: Vec<ContentCandidate>,
    breadcrumb: Selector,
    path_segment: String,
}

impl Extractor {
    pub fn from_config(config: &ConvertConfig) -> Result<Self, ConfigError> {
        let content = config
            .content
            .selectors
            .iter()
            .map(|s| -> Result<_, ConfigError> {
                Ok(ContentCandidate {
                    selector: compile(s)?,
                    needs_body_tag: s.trim().eq_ignore_ascii_case("body"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let CategoriesConfig {
            breadcrumb_selector,
            path_segment,
            ..
        } = &config.categories;
        Ok(Self {
            content,
            breadcrumb: compile(breadcrumb_selector)?,
            path_segment: path_segment.clone(),
        })
    }

    /// Outer HTML of the first content container, in priority order.
    ///
    /// `source` is the raw HTML `document` was parsed from.
    pub fn content(&self, document: &Html, source: &str) -> Option<String> {
        let has_body_tag = BODY_TAG.is_match(source);
        self.content
            .iter()
            .filter(|c| has_body_tag || !c.needs_body_tag)
            .find_map(|c| document.select(&c.selector).next())
            .map(|element| element.html())
    }

    /// Category id from the page's breadcrumbs, if any link points at a category page.
    pub fn breadcrumb_category(&self, document: &Html) -> Option<String> {
        document
            .select(&self.breadcrumb)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains(&self.path_segment))
            .and_then(category_id_from_href)
    }

    /// Resolve the category for an article: a known breadcrumb id, or
    /// [`UNCATEGORIZED_ID`].
    pub fn classify(&self, document: &Html, registry: &Registry) -> String {
        match self.breadcrumb_category(document) {
            Some(id) if registry.contains(&id) => id,
            _ => UNCATEGORIZED_ID.to_string(),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("invalid selector {selector:?}: {e:?}")))
}

/// Last path segment of a link, without query, fragment or `.html`.
///
/// `../en/categories/billing.html?x=1#top` → `billing`
fn category_id_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let last = path.trim_end_matches('/').rsplit('/').next()?;
    let id = last.strip_suffix(".html").unwrap_or(last);
    (!id.is_empty()).then(|| id.to_string())
}

/// Whitespace-normalized text of an element.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first `<h1>`, if it has any.
pub fn heading(document: &Html) -> Option<String> {
    first_text(document, &H1_SELECTOR)
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Article title: `<h1>`, then `<title>`, then the filename.
pub fn title(document: &Html, file_name: &str) -> String {
    heading(document)
        .or_else(|| first_text(document, &TITLE_SELECTOR))
        .unwrap_or_else(|| naming::title_from_filename(file_name))
}
