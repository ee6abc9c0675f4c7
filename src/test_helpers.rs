//! Shared test utilities.
//!
//! Provides fixture setup and manifest lookups that panic with a readable
//! message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(&sources, &ConvertConfig::default()).unwrap();
//! assert_eq!(find_article(&manifest, "invoices.html").title, "Managing Invoices");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::Article;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/export/` (with `articles/` and `categories/`) to a temp
/// directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/export");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a file that `read_to_string` rejects (invalid UTF-8).
pub fn write_unreadable(path: &Path) {
    std::fs::write(path, [0x3c, 0x68, 0x31, 0x3e, 0xff, 0xfe, 0xfd]).unwrap();
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find an article by source file name. Panics if not found.
pub fn find_article<'a>(manifest: &'a Manifest, source: &str) -> &'a Article {
    manifest
        .articles
        .iter()
        .find(|a| a.source == source)
        .unwrap_or_else(|| {
            let sources = article_sources(manifest);
            panic!("article '{source}' not found. Available: {sources:?}")
        })
}

/// All article source names in manifest order.
pub fn article_sources(manifest: &Manifest) -> Vec<&str> {
    manifest.articles.iter().map(|a| a.source.as_str()).collect()
}

/// Titles of the articles filed under a category. Panics if the category is missing.
pub fn category_article_titles<'a>(manifest: &'a Manifest, id: &str) -> Vec<&'a str> {
    let category = manifest.categories.get(id).unwrap_or_else(|| {
        let ids: Vec<&str> = manifest.categories.iter().map(|c| c.id.as_str()).collect();
        panic!("category '{id}' not found. Available: {ids:?}")
    });
    category
        .articles
        .iter()
        .map(|&i| manifest.articles[i].title.as_str())
        .collect()
}
