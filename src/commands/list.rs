//! List site content

use anyhow::Result;

use crate::Vellum;

/// List site content by type
pub fn run(vellum: &Vellum, content_type: &str, json: bool) -> Result<()> {
    let store = vellum.store();

    match content_type {
        "post" | "posts" => {
            let posts = store.select(0, "")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "tag" | "tags" => {
            let posts = store.select(0, "")?;
            let mut tags: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
                return Ok(());
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}
