//! Export scanning and manifest generation.
//!
//! Stage 1 of the conversion pipeline. Reads the category pages and article
//! pages of a help-center export, converts every article to Markdown, and
//! produces a [`Manifest`] that the generate stage writes out. Nothing is
//! written to disk here.
//!
//! ## Input Layout
//!
//! ```text
//! export/
//! ├── categories/                  # Optional, categorized layout only
//! │   ├── billing.html             # <h1>Billing</h1> → category "billing"
//! │   └── getting-started.html
//! └── articles/
//!     ├── first-steps.html         # <a class="breadcrumb" href="../categories/getting-started.html">
//!     ├── invoices.html
//!     └── orphan.html              # No breadcrumb → uncategorized
//! ```
//!
//! Only the top level of each directory is read, and only `*.html` files,
//! in filename order.
//!
//! ## Per-file Outcomes
//!
//! - **No content container**: the article is skipped, never an error.
//! - **Category page without `<h1>`**: the category is skipped silently.
//! - **Unreadable file**: with `keep_going` the article or category page is
//!   recorded as failed and the scan continues; otherwise the scan aborts.

use crate::config::{self, ConvertConfig, Layout};
use crate::convert::{ConvertError, MarkdownConverter};
use crate::extract::{self, Extractor};
use crate::naming;
use crate::types::{Article, Category, Outcome, Registry};
use scraper::Html;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Conversion error in {path}: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
    #[error("Article directory not found: {0}")]
    MissingArticles(PathBuf),
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub layout: Layout,
    pub categories: Registry,
    pub articles: Vec<Article>,
    /// Articles that were skipped or failed during the scan.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<Outcome>,
}

/// Where the export lives.
#[derive(Debug, Clone)]
pub struct Sources<'a> {
    pub articles: &'a Path,
    pub categories: Option<&'a Path>,
}

pub fn scan(sources: &Sources<'_>, config: &ConvertConfig) -> Result<Manifest, ScanError> {
    if !sources.articles.is_dir() {
        return Err(ScanError::MissingArticles(sources.articles.to_path_buf()));
    }
    let extractor = Extractor::from_config(config)?;
    let converter = MarkdownConverter::new();

    let (mut registry, mut outcomes) = match (config.layout, sources.categories) {
        (Layout::Categorized, Some(dir)) => build_registry(dir, config.keep_going)?,
        _ => (Registry::new(), Vec::new()),
    };

    let mut articles = Vec::new();

    for path in list_html_files(sources.articles)? {
        let source = file_name(&path);

        let html = match fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) if config.keep_going => {
                tracing::warn!(file = %source, error = %e, "cannot read article");
                outcomes.push(Outcome::Failed {
                    source,
                    error: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(ScanError::Read { path, source: e }),
        };

        let document = Html::parse_document(&html);
        let title = extract::title(&document, &source);

        let Some(content) = extractor.content(&document, &html) else {
            tracing::debug!(file = %source, "no content container, skipping");
            outcomes.push(Outcome::Skipped {
                source,
                reason: "no content found".to_string(),
            });
            continue;
        };

        let markdown = match converter.convert(&content) {
            Ok(md) => md,
            Err(e) if config.keep_going => {
                tracing::warn!(file = %source, error = %e, "cannot convert article");
                outcomes.push(Outcome::Failed {
                    source,
                    error: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(ScanError::Convert { path, source: e }),
        };

        let category = match config.layout {
            Layout::Flat => None,
            Layout::Categorized => {
                let id = extractor.classify(&document, &registry);
                let index = articles.len();
                match registry.get_mut(&id) {
                    Some(category) => category.articles.push(index),
                    None => registry
                        .uncategorized_mut(&config.categories.uncategorized_title)
                        .articles
                        .push(index),
                }
                Some(id)
            }
        };

        articles.push(Article {
            slug: naming::slug_or(&title, &file_stem(&path)),
            source,
            title,
            category,
            markdown,
        });
    }

    Ok(Manifest {
        layout: config.layout,
        categories: registry,
        articles,
        outcomes,
    })
}

/// Build the category registry from a directory of category pages.
///
/// A missing directory yields an empty registry. Under `keep_going`,
/// unreadable pages come back as `Failed` outcomes.
pub fn build_registry(
    dir: &Path,
    keep_going: bool,
) -> Result<(Registry, Vec<Outcome>), ScanError> {
    let mut registry = Registry::new();
    let mut failures = Vec::new();
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no category directory");
        return Ok((registry, failures));
    }

    for path in list_html_files(dir)? {
        let html = match fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) if keep_going => {
                tracing::warn!(file = %path.display(), error = %e, "cannot read category");
                failures.push(Outcome::Failed {
                    source: format!("categories/{}", file_name(&path)),
                    error: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(ScanError::Read { path, source: e }),
        };

        let document = Html::parse_document(&html);
        let Some(title) = extract::heading(&document) else {
            tracing::debug!(file = %path.display(), "category page has no <h1>, skipping");
            continue;
        };

        let id = file_stem(&path);
        let dir_name = naming::slug_or(&title, &id);
        registry.insert(Category::new(&id, &title, dir_name));
    }

    Ok((registry, failures))
}

/// Top-level `*.html` files of a directory, sorted by name.
fn list_html_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let path = entry?.into_path();
        let is_html = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("html"))
            .unwrap_or(false);
        if is_html && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::UNCATEGORIZED_ID;
    use tempfile::TempDir;

    fn scan_fixtures(tmp: &TempDir, config: &ConvertConfig) -> Manifest {
        let articles = tmp.path().join("articles");
        let categories = tmp.path().join("categories");
        scan(
            &Sources {
                articles: &articles,
                categories: Some(&categories),
            },
            config,
        )
        .unwrap()
    }

    #[test]
    fn registry_reads_categories_with_headings() {
        let tmp = setup_fixtures();
        let (registry, failures) = build_registry(&tmp.path().join("categories"), true).unwrap();
        assert!(failures.is_empty());
        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        // no-heading.html has no <h1> and is skipped
        assert_eq!(ids, vec!["billing", "getting-started"]);
    }

    #[test]
    fn registry_dir_is_slug_of_title() {
        let tmp = setup_fixtures();
        let (registry, _) = build_registry(&tmp.path().join("categories"), true).unwrap();
        let c = registry.get("getting-started").unwrap();
        assert_eq!(c.title, "Getting Started & Setup");
        assert_eq!(c.dir, "getting-started-setup");
    }

    #[test]
    fn registry_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let (registry, _) = build_registry(&tmp.path().join("nope"), false).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn scan_converts_articles_in_filename_order() {
        let tmp = setup_fixtures();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert_eq!(
            article_sources(&manifest),
            vec![
                "first-steps.html",
                "invoices.html",
                "page-title-only.html",
                "untitled-page.html",
            ]
        );
    }

    #[test]
    fn scan_skips_article_without_content() {
        let tmp = setup_fixtures();
        let mut config = ConvertConfig::default();
        config.content.selectors = vec!["article".into()];
        let manifest = scan_fixtures(&tmp, &config);
        let skipped: Vec<&str> = manifest
            .outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Skipped { .. }))
            .map(|o| o.source())
            .collect();
        assert!(skipped.contains(&"page-title-only.html"), "{skipped:?}");
        assert!(!article_sources(&manifest).contains(&"page-title-only.html"));
    }

    #[test]
    fn default_config_skips_pages_without_body_tag() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("articles/bare.html"), "<h1>Bare</h1><p>loose text</p>").unwrap();
        fs::write(tmp.path().join("articles/empty.html"), "").unwrap();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());

        for source in ["bare.html", "empty.html"] {
            assert!(
                manifest
                    .outcomes
                    .iter()
                    .any(|o| matches!(o, Outcome::Skipped { source: s, .. } if s == source)),
                "{source} not skipped: {:?}",
                manifest.outcomes
            );
            assert!(!article_sources(&manifest).contains(&source));
        }
        // untitled-page.html has a real <body>, so it is still converted
        assert!(article_sources(&manifest).contains(&"untitled-page.html"));
    }

    #[test]
    fn unreadable_category_recorded_when_keep_going() {
        let tmp = setup_fixtures();
        write_unreadable(&tmp.path().join("categories/billing.html"));
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());

        assert!(matches!(
            &manifest.outcomes[..],
            [Outcome::Failed { source, .. }] if source == "categories/billing.html"
        ));
        assert!(!manifest.categories.contains("billing"));
        assert_eq!(
            find_article(&manifest, "invoices.html").category.as_deref(),
            Some(UNCATEGORIZED_ID)
        );
    }

    #[test]
    fn unreadable_category_aborts_without_keep_going() {
        let tmp = setup_fixtures();
        write_unreadable(&tmp.path().join("categories/billing.html"));
        let result = build_registry(&tmp.path().join("categories"), false);
        assert!(matches!(result, Err(ScanError::Read { .. })));
    }

    #[test]
    fn scan_title_fallbacks() {
        let tmp = setup_fixtures();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert_eq!(find_article(&manifest, "first-steps.html").title, "First Steps");
        assert_eq!(
            find_article(&manifest, "page-title-only.html").title,
            "Only A Page Title"
        );
        assert_eq!(
            find_article(&manifest, "untitled-page.html").title,
            "Untitled Page"
        );
    }

    #[test]
    fn scan_classifies_by_breadcrumb() {
        let tmp = setup_fixtures();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert_eq!(
            find_article(&manifest, "first-steps.html").category.as_deref(),
            Some("getting-started")
        );
        assert_eq!(
            find_article(&manifest, "invoices.html").category.as_deref(),
            Some("billing")
        );
        assert_eq!(
            category_article_titles(&manifest, "billing"),
            vec!["Managing Invoices"]
        );
    }

    #[test]
    fn scan_creates_uncategorized_lazily() {
        let tmp = setup_fixtures();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        let unc = manifest.categories.get(UNCATEGORIZED_ID).unwrap();
        assert_eq!(unc.title, "Uncategorized");
        assert_eq!(
            category_article_titles(&manifest, UNCATEGORIZED_ID),
            vec!["Only A Page Title", "Untitled Page"]
        );
    }

    #[test]
    fn scan_without_orphans_has_no_uncategorized() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("articles/page-title-only.html")).unwrap();
        fs::remove_file(tmp.path().join("articles/untitled-page.html")).unwrap();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert!(!manifest.categories.contains(UNCATEGORIZED_ID));
    }

    #[test]
    fn flat_layout_ignores_categories() {
        let tmp = setup_fixtures();
        let config = ConvertConfig {
            layout: Layout::Flat,
            ..Default::default()
        };
        let manifest = scan_fixtures(&tmp, &config);
        assert!(manifest.categories.is_empty());
        assert!(manifest.articles.iter().all(|a| a.category.is_none()));
    }

    #[test]
    fn unreadable_article_recorded_when_keep_going() {
        let tmp = setup_fixtures();
        write_unreadable(&tmp.path().join("articles/broken.html"));
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert!(matches!(
            &manifest.outcomes[..],
            [Outcome::Failed { source, .. }] if source == "broken.html"
        ));
        assert_eq!(manifest.articles.len(), 4);
    }

    #[test]
    fn unreadable_article_aborts_without_keep_going() {
        let tmp = setup_fixtures();
        write_unreadable(&tmp.path().join("articles/broken.html"));
        let config = ConvertConfig {
            keep_going: false,
            ..Default::default()
        };
        let articles = tmp.path().join("articles");
        let result = scan(
            &Sources {
                articles: &articles,
                categories: None,
            },
            &config,
        );
        assert!(matches!(result, Err(ScanError::Read { .. })));
    }

    #[test]
    fn missing_articles_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let articles = tmp.path().join("articles");
        let result = scan(
            &Sources {
                articles: &articles,
                categories: None,
            },
            &ConvertConfig::default(),
        );
        assert!(matches!(result, Err(ScanError::MissingArticles(_))));
    }

    #[test]
    fn non_html_files_ignored() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("articles/notes.txt"), "<h1>Nope</h1>").unwrap();
        fs::create_dir(tmp.path().join("articles/nested.html")).unwrap();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        assert_eq!(manifest.articles.len(), 4);
        assert!(manifest.outcomes.is_empty());
    }

    #[test]
    fn manifest_serializes_without_markdown_bodies() {
        let tmp = setup_fixtures();
        let manifest = scan_fixtures(&tmp, &ConvertConfig::default());
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["layout"], "categorized");
        assert_eq!(json["articles"][0]["slug"], "first-steps");
        assert!(json["articles"][0].get("markdown").is_none());
        assert_eq!(json["categories"][0]["id"], "billing");
    }
}
