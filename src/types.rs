//! Shared types passed from scan to generate.
//!
//! The [`Registry`] is built once during scan and handed to generate by
//! value; nothing here is global.

use serde::Serialize;

/// Category id assigned to articles with no known category.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// A group of articles with its own output directory and `README.md`.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Source file stem of the category page (`billing.html` → `billing`).
    pub id: String,
    /// Text of the category page's first `<h1>`.
    pub title: String,
    /// Output directory name, the slug of the title.
    pub dir: String,
    /// Sentence written under the heading of the category `README.md`.
    pub description: String,
    /// Indices into [`crate::scan::Manifest::articles`], in processing order.
    pub articles: Vec<usize>,
}

impl Category {
    pub fn new(id: &str, title: &str, dir: String) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            dir,
            description: format!(
                "This section contains documentation related to {}.",
                title.to_lowercase()
            ),
            articles: Vec::new(),
        }
    }

    fn uncategorized(title: &str) -> Self {
        Self {
            id: UNCATEGORIZED_ID.to_string(),
            title: title.to_string(),
            dir: crate::naming::slug(title),
            description: "This section contains documentation that hasn't been categorized yet."
                .to_string(),
            articles: Vec::new(),
        }
    }
}

/// Ordered set of categories, in the order their pages were read.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Registry {
    categories: Vec<Category>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// The uncategorized bucket, created on first use.
    pub fn uncategorized_mut(&mut self, title: &str) -> &mut Category {
        let pos = match self.categories.iter().position(|c| c.id == UNCATEGORIZED_ID) {
            Some(pos) => pos,
            None => {
                self.categories.push(Category::uncategorized(title));
                self.categories.len() - 1
            }
        };
        &mut self.categories[pos]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One converted documentation page.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Source file name (`getting-started.html`).
    pub source: String,
    pub title: String,
    /// Output file stem; the file is `{slug}.md`.
    pub slug: String,
    /// Category id, `None` in the flat layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Converted Markdown body, without the title heading.
    #[serde(skip)]
    pub markdown: String,
}

impl Article {
    /// Full file content: title heading, blank line, body. Always ends with
    /// a newline.
    pub fn document(&self) -> String {
        let body = self.markdown.trim_end_matches('\n');
        if body.is_empty() {
            format!("# {}\n", self.title)
        } else {
            format!("# {}\n\n{}\n", self.title, body)
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Written; `path` is relative to the output root.
    Converted { source: String, title: String, path: String },
    /// Nothing to convert, not an error.
    Skipped { source: String, reason: String },
    /// Read or write error recorded under `keep_going`.
    Failed { source: String, error: String },
}

impl Outcome {
    pub fn source(&self) -> &str {
        match self {
            Outcome::Converted { source, .. }
            | Outcome::Skipped { source, .. }
            | Outcome::Failed { source, .. } => source,
        }
    }
}

/// Per-run tallies printed after the last file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    Outcome::Converted { .. } => summary.converted += 1,
                    Outcome::Skipped { .. } => summary.skipped += 1,
                    Outcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Converted {} articles ({} skipped, {} failed)",
            self.converted, self.skipped, self.failed
        )
    }
}
