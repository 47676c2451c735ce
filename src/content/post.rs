//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Metadata for a single blog post
///
/// Built from the front matter of a post fragment; immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Post tags
    pub tags: Vec<String>,

    /// Slug (fragment file stem), doubles as the URL identifier
    pub slug: String,

    /// Short summary for listing pages
    pub summary: Option<String>,

    /// URL path of the post page
    pub path: String,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, slug: String) -> Self {
        let path = format!("/posts/{}", slug);
        Self {
            title,
            date,
            tags: Vec::new(),
            slug,
            summary: None,
            path,
        }
    }

    /// Whether this post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
