//! Wiki generation.
//!
//! Stage 2 of the conversion pipeline. Takes the scan [`Manifest`] and writes
//! the wiki tree.
//!
//! ## Output Structure
//!
//! ```text
//! wiki/                          # categorized layout
//! ├── Home.md                    # Heading, welcome paragraph, category links
//! ├── _Sidebar.md                # Home link, categories with nested articles
//! ├── billing/
//! │   ├── README.md              # Heading, description, article links
//! │   └── managing-invoices.md
//! └── uncategorized/             # Only when some article had no known category
//!     ├── README.md
//!     └── untitled-page.md
//!
//! wiki/                          # flat layout
//! ├── Home.md                    # Heading, welcome paragraph, article links
//! ├── _Sidebar.md
//! ├── first-steps.md
//! └── managing-invoices.md
//! ```
//!
//! ## Write Order
//!
//! 1. Category directories and `README.md` stubs, before any article.
//! 2. Each article file, followed by an append of its link to the category
//!    `README.md`. Every append opens and closes the file.
//! 3. `Home.md` and `_Sidebar.md`, rendered in full from the final registry.
//!
//! Two articles whose titles slug identically share one output file: the
//! later one overwrites the earlier. Two categories whose titles slug
//! identically share one directory, and the later `README.md` stub replaces
//! the earlier one. Both are logged, not prevented.

use crate::config::{ConvertConfig, Layout};
use crate::scan::Manifest;
use crate::types::{Article, Category, Outcome, Registry};
use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HOME_FILE: &str = "Home.md";
pub const SIDEBAR_FILE: &str = "_Sidebar.md";
pub const CATEGORY_INDEX_FILE: &str = "README.md";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot write {path}: {source}")]
    WriteArticle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write the wiki for `manifest` into `output_dir`.
///
/// Returns one outcome per article in the manifest, in manifest order.
pub fn generate(
    manifest: &Manifest,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<Vec<Outcome>, GenerateError> {
    generate_with(manifest, output_dir, config, |_| {})
}

/// Like [`generate`], calling `on_outcome` as soon as each article is
/// written or has failed. Outcomes reported before an abort stay reported.
pub fn generate_with(
    manifest: &Manifest,
    output_dir: &Path,
    config: &ConvertConfig,
    mut on_outcome: impl FnMut(&Outcome),
) -> Result<Vec<Outcome>, GenerateError> {
    fs::create_dir_all(output_dir)?;

    if manifest.layout == Layout::Categorized {
        for (earlier, later) in colliding_category_dirs(&manifest.categories) {
            tracing::warn!(
                category = %later.id,
                earlier = %earlier.id,
                dir = %later.dir,
                "category title slug collides with an earlier category, sharing its directory"
            );
        }
        for category in manifest.categories.iter() {
            let dir = output_dir.join(&category.dir);
            fs::create_dir_all(&dir)?;
            fs::write(dir.join(CATEGORY_INDEX_FILE), render_category_index(category))?;
        }
    }

    let mut outcomes = Vec::with_capacity(manifest.articles.len());
    let mut written = HashSet::new();
    let mut converted = vec![false; manifest.articles.len()];

    for (index, article) in manifest.articles.iter().enumerate() {
        let rel_path = article_path(&manifest.categories, article);
        let path = output_dir.join(&rel_path);

        if !written.insert(path.clone()) {
            tracing::warn!(
                file = %article.source,
                path = %rel_path,
                "title slug collides with an earlier article, overwriting"
            );
        }

        let outcome = match write_article(output_dir, &manifest.categories, article) {
            Ok(()) => {
                converted[index] = true;
                Outcome::Converted {
                    source: article.source.clone(),
                    title: article.title.clone(),
                    path: rel_path,
                }
            }
            Err(e) if config.keep_going => {
                tracing::warn!(file = %article.source, error = %e, "cannot write article");
                Outcome::Failed {
                    source: article.source.clone(),
                    error: e.to_string(),
                }
            }
            Err(e) => return Err(GenerateError::WriteArticle { path, source: e }),
        };
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    fs::write(
        output_dir.join(HOME_FILE),
        render_home(manifest, config, &converted),
    )?;
    fs::write(
        output_dir.join(SIDEBAR_FILE),
        render_sidebar(manifest, config, &converted),
    )?;

    Ok(outcomes)
}

/// Write one article file and, in the categorized layout, append its link
/// to the category index.
fn write_article(
    output_dir: &Path,
    registry: &Registry,
    article: &Article,
) -> std::io::Result<()> {
    let category = article.category.as_deref().and_then(|id| registry.get(id));
    let dir = match category {
        Some(c) => output_dir.join(&c.dir),
        None => output_dir.to_path_buf(),
    };
    fs::write(dir.join(format!("{}.md", article.slug)), article.document())?;

    if category.is_some() {
        append_line(
            &dir.join(CATEGORY_INDEX_FILE),
            &link_line(&article.title, &article.slug),
        )?;
    }
    Ok(())
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

/// Pairs of categories sharing an output directory, as
/// `(first category with that dir, later category)`.
pub fn colliding_category_dirs(registry: &Registry) -> Vec<(&Category, &Category)> {
    let mut owners: HashMap<&str, &Category> = HashMap::new();
    let mut collisions = Vec::new();
    for category in registry.iter() {
        match owners.get(category.dir.as_str()) {
            Some(&earlier) => collisions.push((earlier, category)),
            None => {
                owners.insert(&category.dir, category);
            }
        }
    }
    collisions
}

/// Output path of an article relative to the output root.
pub fn article_path(registry: &Registry, article: &Article) -> String {
    match article.category.as_deref().and_then(|id| registry.get(id)) {
        Some(c) => format!("{}/{}.md", c.dir, article.slug),
        None => format!("{}.md", article.slug),
    }
}

fn link_line(title: &str, target: &str) -> String {
    format!("- [{title}]({target})")
}

/// Initial `README.md` of a category, before any article link is appended.
pub fn render_category_index(category: &Category) -> String {
    format!(
        "# {}\n\n{}\n\n## Articles\n\n",
        category.title, category.description
    )
}

/// Full `Home.md`.
///
/// Categorized: one link per category, including empty ones. Flat: one link
/// per written article.
pub fn render_home(manifest: &Manifest, config: &ConvertConfig, converted: &[bool]) -> String {
    let mut out = format!("# {}\n\n{}\n\n", config.site.title, config.site.welcome);
    match manifest.layout {
        Layout::Categorized => {
            out.push_str("## Categories\n\n");
            for category in manifest.categories.iter() {
                out.push_str(&link_line(&category.title, &format!("{}/README", category.dir)));
                out.push('\n');
            }
        }
        Layout::Flat => {
            out.push_str("## Articles\n\n");
            for article in written_articles(manifest, converted) {
                out.push_str(&link_line(&article.title, &article.slug));
                out.push('\n');
            }
        }
    }
    out
}

/// Full `_Sidebar.md`.
///
/// Categorized: every category with at least one written article, its
/// articles nested below. Flat: an `Articles` group with every article.
pub fn render_sidebar(manifest: &Manifest, config: &ConvertConfig, converted: &[bool]) -> String {
    let mut out = format!("# {}\n\n- [Home](Home)\n", config.site.sidebar_title);
    match manifest.layout {
        Layout::Categorized => {
            for category in manifest.categories.iter() {
                let articles: Vec<&Article> = category
                    .articles
                    .iter()
                    .filter(|&&i| converted.get(i).copied().unwrap_or(false))
                    .filter_map(|&i| manifest.articles.get(i))
                    .collect();
                if articles.is_empty() {
                    continue;
                }
                out.push_str(&link_line(&category.title, &format!("{}/README", category.dir)));
                out.push('\n');
                for article in articles {
                    out.push_str("  ");
                    out.push_str(&link_line(
                        &article.title,
                        &format!("{}/{}", category.dir, article.slug),
                    ));
                    out.push('\n');
                }
            }
        }
        Layout::Flat => {
            out.push_str("- **Articles**\n");
            for article in written_articles(manifest, converted) {
                out.push_str("  ");
                out.push_str(&link_line(&article.title, &article.slug));
                out.push('\n');
            }
        }
    }
    out
}

fn written_articles<'a>(
    manifest: &'a Manifest,
    converted: &'a [bool],
) -> impl Iterator<Item = &'a Article> {
    manifest
        .articles
        .iter()
        .zip(converted)
        .filter(|(_, ok)| **ok)
        .map(|(a, _)| a)
}
