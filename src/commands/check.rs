//! Check that every template fragment under html/ parses

use anyhow::{anyhow, Result};
use std::fs;
use walkdir::WalkDir;

use crate::content::FrontMatter;
use crate::Vellum;

/// Parse every fragment and report the ones Tera rejects
pub fn run(vellum: &Vellum) -> Result<()> {
    if !vellum.html_dir.exists() {
        return Err(anyhow!(
            "template directory not found: {:?}",
            vellum.html_dir
        ));
    }

    let mut checked = 0usize;
    let mut failures = 0usize;

    for entry in WalkDir::new(&vellum.html_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_fragment = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.ends_with(".tmpl.html"))
            .unwrap_or(false);
        if !path.is_file() || !is_fragment {
            continue;
        }

        let name = path
            .strip_prefix(&vellum.html_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .trim_end_matches(".tmpl.html")
            .to_string();

        let source = fs::read_to_string(path)?;
        let (_, body) = FrontMatter::parse(&source);

        let mut tera = tera::Tera::default();
        match tera.add_raw_template(&name, body) {
            Ok(_) => checked += 1,
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", name, e);
            }
        }
    }

    println!("Checked {} fragments, {} failed.", checked + failures, failures);

    if failures > 0 {
        return Err(anyhow!("{} fragments failed to parse", failures));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[test]
    fn test_scaffolded_site_passes_check() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        let vellum = Vellum::new(tmp.path()).unwrap();

        run(&vellum).unwrap();
    }

    #[test]
    fn test_broken_fragment_fails_check() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        std::fs::write(
            tmp.path().join("html/pages/broken.tmpl.html"),
            "{% endfor %}",
        )
        .unwrap();
        let vellum = Vellum::new(tmp.path()).unwrap();

        assert!(run(&vellum).is_err());
    }
}
