//! Converter configuration.
//!
//! Handles loading, validating, and merging `helpwiki.toml`. Stock defaults
//! reproduce the behavior of a categorized conversion with best-effort error
//! handling; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! layout = "categorized"    # "categorized" or "flat"
//! keep_going = true         # log per-file errors and continue
//!
//! [site]
//! title = "Documentation"   # Home.md heading
//! welcome = "Welcome to the documentation. ..."
//! sidebar_title = "Documentation"
//!
//! [categories]
//! breadcrumb_selector = "a.breadcrumb"
//! path_segment = "categories"
//! uncategorized_title = "Uncategorized"
//!
//! [content]
//! selectors = ["article", "div.article-body", "div.content", "body"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "helpwiki.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How converted articles are laid out in the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Every article in the output root, `Home.md` lists articles.
    Flat,
    /// One directory per category, `Home.md` lists categories.
    Categorized,
}

/// Converter configuration loaded from `helpwiki.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub layout: Layout,
    /// When true, an article that cannot be read or written is recorded as
    /// failed and the run continues. When false, the first such error aborts.
    pub keep_going: bool,
    /// Text of the generated index pages.
    pub site: SiteConfig,
    /// Category detection settings.
    pub categories: CategoriesConfig,
    /// Content container lookup settings.
    pub content: ContentConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Categorized,
            keep_going: true,
            site: SiteConfig::default(),
            categories: CategoriesConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Validate that values are usable before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.content.selectors.is_empty() {
            return Err(ConfigError::Validation(
                "content.selectors must not be empty".into(),
            ));
        }
        for selector in &self.content.selectors {
            check_selector("content.selectors", selector)?;
        }
        check_selector(
            "categories.breadcrumb_selector",
            &self.categories.breadcrumb_selector,
        )?;
        if self.categories.path_segment.is_empty() {
            return Err(ConfigError::Validation(
                "categories.path_segment must not be empty".into(),
            ));
        }
        if naming::slug(&self.categories.uncategorized_title).is_empty() {
            return Err(ConfigError::Validation(
                "categories.uncategorized_title must contain at least one letter or digit".into(),
            ));
        }
        Ok(())
    }
}

fn check_selector(key: &str, selector: &str) -> Result<(), ConfigError> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("{key}: invalid selector {selector:?}: {e:?}")))
}

/// Headings and boilerplate written into `Home.md` and `_Sidebar.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// First heading of `Home.md`.
    pub title: String,
    /// Paragraph under the `Home.md` heading.
    pub welcome: String,
    /// First heading of `_Sidebar.md`.
    pub sidebar_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            welcome: "Welcome to the documentation. This wiki contains all the information you need to get started.".to_string(),
            sidebar_title: "Documentation".to_string(),
        }
    }
}

/// Breadcrumb-based category detection.
///
/// Help-center exports link each article back to its category page; the
/// last path segment of that link is the category file stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoriesConfig {
    /// CSS selector for the breadcrumb links of an article.
    pub breadcrumb_selector: String,
    /// A link only counts when its `href` contains this segment.
    pub path_segment: String,
    /// Title of the bucket for articles with no known category.
    pub uncategorized_title: String,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            breadcrumb_selector: "a.breadcrumb".to_string(),
            path_segment: "categories".to_string(),
            uncategorized_title: "Uncategorized".to_string(),
        }
    }
}

/// Ordered content container candidates; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub selectors: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            selectors: ["article", "div.article-body", "div.content", "body"]
                .map(String::from)
                .to_vec(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ConvertConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ConvertConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ConvertConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file.
///
/// With `required = false` a missing file yields the stock defaults; with
/// `required = true` it is an IO error.
pub fn load_config(path: &Path, required: bool) -> Result<ConvertConfig, ConfigError> {
    if !required && !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `helpwiki.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# helpwiki configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# "categorized": one directory per category, Home.md lists categories.
# "flat": every article in the output root, Home.md lists articles.
layout = "categorized"

# Log and skip articles that cannot be read or written instead of aborting.
keep_going = true

# ---------------------------------------------------------------------------
# Index pages
# ---------------------------------------------------------------------------
[site]
title = "Documentation"
welcome = "Welcome to the documentation. This wiki contains all the information you need to get started."
sidebar_title = "Documentation"

# ---------------------------------------------------------------------------
# Category detection
# ---------------------------------------------------------------------------
# An article belongs to the category whose file stem is the last path
# segment of its first breadcrumb link containing `path_segment`.
[categories]
breadcrumb_selector = "a.breadcrumb"
path_segment = "categories"
uncategorized_title = "Uncategorized"

# ---------------------------------------------------------------------------
# Content extraction
# ---------------------------------------------------------------------------
# CSS selectors tried in order; the first matching element is converted.
[content]
selectors = ["article", "div.article-body", "div.content", "body"]
"##
}
