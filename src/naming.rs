//! Centralized naming rules for output files and display titles.
//!
//! Every generated file and directory name goes through [`slug`]: category
//! directories, article files, and the links in the index pages. Keeping one
//! function means a link written into `Home.md` always points at the file
//! that was actually written.
//!
//! ## Slugs
//!
//! - `"Getting Started"` → `"getting-started"`
//! - `"FAQ: Billing & Invoices"` → `"faq-billing-invoices"`
//! - `"--Already--slugged--"` → `"already-slugged"`
//! - `"!!!"` → `""` (callers pick a fallback)
//!
//! ## Display Titles
//!
//! When a page has neither `<h1>` nor `<title>`, the title comes from the
//! source filename: extension stripped, dashes become spaces, words
//! title-cased:
//! - `getting-started.html` → "Getting Started"
//! - `how-to-use-2fa.html` → "How To Use 2Fa"

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("BUG: hardcoded slug regex is invalid"));

static DASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("BUG: hardcoded dash regex is invalid"));

/// Name used when neither the title nor the source stem yields a slug.
pub const UNTITLED_SLUG: &str = "untitled";

/// Turn an arbitrary title into a filesystem- and URL-safe identifier.
///
/// Lowercases, replaces everything outside `[a-z0-9-]` with `-`, collapses
/// dash runs and trims dashes from both ends. May return an empty string.
pub fn slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let replaced = NON_SLUG_CHARS.replace_all(&lower, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug of `title`, falling back to the slug of `fallback`, then [`UNTITLED_SLUG`].
pub fn slug_or(title: &str, fallback: &str) -> String {
    [slug(title), slug(fallback)]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED_SLUG.to_string())
}

/// Synthesize a display title from a source filename.
///
/// Always non-empty for a non-empty filename stem.
pub fn title_from_filename(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    title_case(&stem.replace('-', " "))
}

/// Upper-case a letter when the character before it is not a letter,
/// lower-case it otherwise.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
