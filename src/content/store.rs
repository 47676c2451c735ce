//! Post store - scans post fragments and selects sorted/filtered metadata

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{FrontMatter, Post};

/// Errors from the post store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The post fragment directory cannot be read or listed
    #[error("post source unavailable at {path:?}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only metadata store over the post fragment directory
///
/// Every selection re-scans the directory, so edits to post fragments show
/// up on the next request without a restart.
pub struct PostStore {
    posts_dir: PathBuf,
}

impl PostStore {
    /// Create a store over the given post fragment directory
    pub fn new<P: Into<PathBuf>>(posts_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    /// Select posts sorted by date descending, optionally filtered and limited
    ///
    /// Posts are ordered newest first, ties broken by slug so output is
    /// deterministic. A non-empty `tag` keeps only posts carrying that tag;
    /// filtering happens before the limit. `limit == 0` means no limit.
    pub fn select(&self, limit: usize, tag: &str) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.scan()?;

        if !tag.is_empty() {
            posts.retain(|p| p.has_tag(tag));
        }

        if limit > 0 {
            posts.truncate(limit);
        }

        Ok(posts)
    }

    /// Scan the post directory and parse metadata from every fragment
    fn scan(&self) -> Result<Vec<Post>, StoreError> {
        let entries = fs::read_dir(&self.posts_dir).map_err(|e| StoreError::Unavailable {
            path: self.posts_dir.clone(),
            source: e,
        })?;

        let mut posts = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Unavailable {
                path: self.posts_dir.clone(),
                source: e,
            })?;
            let path = entry.path();

            if path.is_file() && is_fragment_file(&path) {
                match load_post(&path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date descending (newest first), slug breaks ties
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        Ok(posts)
    }
}

/// Parse a single post fragment into its metadata record
fn load_post(path: &Path) -> Result<Post> {
    let content = fs::read_to_string(path)?;
    let (fm, _body) = FrontMatter::parse(&content);

    let slug = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_end_matches(".tmpl.html"))
        .unwrap_or("untitled")
        .to_string();

    // Front-matter date, falling back to the file's mtime
    let date = fm.parse_date().unwrap_or_else(|| {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now())
    });

    let title = fm.title.unwrap_or_else(|| slug.clone());

    let mut post = Post::new(title, date, slug);
    post.tags = fm.tags;
    post.summary = fm.summary;

    Ok(post)
}

/// Check if a file is a template fragment
fn is_fragment_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(".tmpl.html"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(dir: &Path, slug: &str, date: &str, tags: &[&str]) {
        let tags = tags
            .iter()
            .map(|t| format!("  - {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        let content = format!(
            "---\ntitle: {}\ndate: {}\ntags:\n{}\n---\n<article>{}</article>\n",
            slug, date, tags, slug
        );
        fs::write(dir.join(format!("{}.tmpl.html", slug)), content).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "oldest", "2023-01-01", &["article"]);
        write_post(tmp.path(), "middle", "2024-06-15", &["note"]);
        write_post(tmp.path(), "newest", "2025-03-20", &["article", "rust"]);
        tmp
    }

    #[test]
    fn test_sorted_by_date_descending() {
        let tmp = fixture();
        let store = PostStore::new(tmp.path());

        let posts = store.select(0, "").unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_date_ties_break_on_slug() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "beta", "2024-01-01", &["article"]);
        write_post(tmp.path(), "alpha", "2024-01-01", &["article"]);
        let store = PostStore::new(tmp.path());

        let posts = store.select(0, "").unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_limit_truncates() {
        let tmp = fixture();
        let store = PostStore::new(tmp.path());

        let posts = store.select(2, "").unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle"]);
    }

    #[test]
    fn test_tag_filter() {
        let tmp = fixture();
        let store = PostStore::new(tmp.path());

        let posts = store.select(0, "article").unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "oldest"]);
    }

    #[test]
    fn test_filter_applies_before_limit() {
        let tmp = fixture();
        let store = PostStore::new(tmp.path());

        // "middle" is newer than "oldest" but untagged, so it must never
        // fill the limit
        let posts = store.select(2, "article").unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "oldest"]);
    }

    #[test]
    fn test_missing_dir_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let store = PostStore::new(tmp.path().join("nope"));

        let err = store.select(0, "").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[test]
    fn test_non_fragment_files_ignored() {
        let tmp = fixture();
        fs::write(tmp.path().join("notes.txt"), "not a fragment").unwrap();
        let store = PostStore::new(tmp.path());

        let posts = store.select(0, "").unwrap();
        assert!(posts.iter().all(|p| p.slug != "notes"));
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn test_bad_frontmatter_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("broken.tmpl.html"),
            "---\ndate: [:\n---\nbody\n",
        )
        .unwrap();
        let store = PostStore::new(tmp.path());

        // The fragment still loads; title defaults to the slug and the date
        // to the file's mtime
        let posts = store.select(0, "").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "broken");
    }
}
