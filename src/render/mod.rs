//! Fragment rendering using the Tera template engine
//!
//! A page is an ordered list of fragment names: the base layout first, the
//! page-specific content fragment second, shared partials after. Fragments
//! are read from disk on every render, composed into a one-off Tera
//! instance and executed into a fully buffered string.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Tera};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{FrontMatter, Post};

/// Registration name of the layout fragment
pub const BASE: &str = "base";
/// Registration name of the page content fragment
pub const CONTENT: &str = "content";

/// Errors from fragment resolution and rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The named fragment does not exist under the template directory
    #[error("template fragment not found: {0}")]
    NotFound(String),

    /// The fragment exists but could not be read
    #[error("failed to read template fragment {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Composition or execution of the template failed
    #[error("template rendering failed: {0}")]
    Execution(#[from] tera::Error),
}

/// Renders pages from template fragments under a site's html directory
pub struct Renderer {
    html_dir: PathBuf,
}

impl Renderer {
    /// Create a renderer over the given template directory
    pub fn new<P: Into<PathBuf>>(html_dir: P) -> Self {
        Self {
            html_dir: html_dir.into(),
        }
    }

    /// Compose the given fragments and render them against the context
    ///
    /// `fragments[0]` is registered as `base`, `fragments[1]` as `content`,
    /// any remaining entries under their own names. The layout entry point
    /// (`base`) is executed and the output returned as one buffered string.
    pub fn render(&self, fragments: &[String], context: &Context) -> Result<String, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut sources = Vec::with_capacity(fragments.len());
        for (i, name) in fragments.iter().enumerate() {
            let registered = match i {
                0 => BASE.to_string(),
                1 => CONTENT.to_string(),
                _ => name.clone(),
            };
            sources.push((registered, self.resolve(name)?));
        }

        tera.add_raw_templates(sources)?;
        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("strip_html", strip_html_filter);

        Ok(tera.render(BASE, context)?)
    }

    /// Resolve a fragment name to its template source
    ///
    /// Post fragments carry YAML front matter for their metadata; it is
    /// stripped here so only template source reaches the engine.
    fn resolve(&self, name: &str) -> Result<String, RenderError> {
        if name.split('/').any(|part| part == "..") {
            return Err(RenderError::NotFound(name.to_string()));
        }

        let path = self.html_dir.join(format!("{}.tmpl.html", name));
        match fs::read_to_string(&path) {
            Ok(source) => {
                let (_, body) = FrontMatter::parse(&source);
                Ok(body.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::NotFound(name.to_string()))
            }
            Err(e) => Err(RenderError::Io {
                name: name.to_string(),
                source: e,
            }),
        }
    }

}

/// Tera filter: format a YYYY-MM-DD date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y-%m-%d".to_string(),
    };

    if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(tera::Value::String(date.format(&format).to_string()));
    }

    // Not a date we recognize, return as-is
    Ok(tera::Value::String(s))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Data structures for template context

/// Site identity exposed to templates as `site`
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,
}

impl SiteView {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            language: config.language.clone(),
        }
    }
}

/// Post metadata exposed to templates as entries of `posts`
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub date: String,
    pub slug: String,
    pub path: String,
    pub tags: Vec<String>,
    pub summary: Option<String>,
}

impl PostView {
    pub fn from_post(post: &Post, date_format: &str) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date.format(date_format).to_string(),
            slug: post.slug.clone(),
            path: post.path.clone(),
            tags: post.tags.clone(),
            summary: post.summary.clone(),
        }
    }
}

/// Build a template context from site config and selected posts
pub fn page_context(config: &SiteConfig, posts: &[Post]) -> Context {
    let views: Vec<PostView> = posts
        .iter()
        .map(|p| PostView::from_post(p, &config.date_format))
        .collect();

    let mut context = Context::new();
    context.insert("site", &SiteView::from_config(config));
    context.insert("posts", &views);
    context
}
