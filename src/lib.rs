//! # Helpwiki
//!
//! Converts a static HTML export of a help center into Markdown pages laid
//! out for a Git-backed wiki: a `Home.md` landing page, a `_Sidebar.md`
//! navigation file, and one Markdown file per article.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      articles/ + categories/  →  Manifest   (HTML → structured data + Markdown)
//! 2. Generate  Manifest                 →  wiki/      (Markdown tree on disk)
//! ```
//!
//! The scan stage reads and converts everything but writes nothing, so the
//! `check` and `scan` commands can report what a conversion would produce.
//! The manifest serializes to JSON for inspection.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads category and article pages, builds the manifest |
//! | [`generate`] | Stage 2: writes articles, category indexes, home and sidebar pages |
//! | [`config`] | `helpwiki.toml` loading, merging over stock defaults, validation |
//! | [`extract`] | Title, content container and breadcrumb category lookup |
//! | [`convert`] | HTML fragment → Markdown rendering |
//! | [`types`] | Categories, the category registry, articles and per-file outcomes |
//! | [`naming`] | Title → slug and filename → title rules |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Layouts
//!
//! **Categorized** puts each article under the directory of the category its
//! breadcrumbs point at. Articles with no known category go to a lazily
//! created `uncategorized/` group. **Flat** writes every article at the
//! output root and never reads category pages.
//!
//! # Failure Policy
//!
//! With `keep_going = true` (the default) a file that cannot be read,
//! converted or written is reported and the run continues. With
//! `keep_going = false` the first such error aborts the run. Articles with
//! no content container are always skipped, not failed.

pub mod config;
pub mod convert;
pub mod extract;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
