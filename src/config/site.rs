//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    /// Host prefixes that skip the locale redirect
    pub locale_prefixes: Vec<String>,

    // Directory
    pub html_dir: String,
    pub static_dir: String,

    // Home page
    #[serde(default)]
    pub index: IndexConfig,

    // Date format (strftime)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Vellum".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            locale_prefixes: vec![
                "www.".to_string(),
                "en.".to_string(),
                "es.".to_string(),
                "de.".to_string(),
            ],

            html_dir: "html".to_string(),
            static_dir: "static".to_string(),

            index: IndexConfig::default(),

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Home page post selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum posts shown on the home page (0 for all)
    pub limit: usize,
    /// Only posts carrying this tag appear on the home page (empty for all)
    pub tag: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            limit: 3,
            tag: "article".to_string(),
        }
    }
}
