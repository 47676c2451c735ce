//! vellum: a small blog server that composes pages from template fragments
//!
//! Pages are assembled per request from a base layout plus page-specific
//! fragments stored under the site's `html` directory. Post metadata lives
//! in YAML front matter at the top of each post fragment.

pub mod commands;
pub mod config;
pub mod content;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The main vellum application
#[derive(Clone)]
pub struct Vellum {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Template fragment directory
    pub html_dir: std::path::PathBuf,
    /// Static asset directory
    pub static_dir: std::path::PathBuf,
}

impl Vellum {
    /// Create a new vellum instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let html_dir = base_dir.join(&config.html_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            html_dir,
            static_dir,
        })
    }

    /// Post metadata store over the post fragment directory
    pub fn store(&self) -> content::PostStore {
        content::PostStore::new(self.html_dir.join("posts"))
    }

    /// Fragment renderer over the template directory
    pub fn renderer(&self) -> render::Renderer {
        render::Renderer::new(&self.html_dir)
    }
}
