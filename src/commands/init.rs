//! Initialize a new vellum site
//!
//! Scaffolds the `_config.yml`, the `html/` fragment tree (layout, pages,
//! error pages, shared partials, a sample post and tag page) and `static/`.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Vellum;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("html/pages"))?;
    fs::create_dir_all(target_dir.join("html/posts"))?;
    fs::create_dir_all(target_dir.join("html/tags"))?;
    fs::create_dir_all(target_dir.join("html/partials"))?;
    fs::create_dir_all(target_dir.join("html/errors"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    // Create default _config.yml
    let config_content = r#"# Vellum Configuration

# Site
title: Vellum
description: ''
author: John Doe
language: en

# URL
url: http://example.com
locale_prefixes:
  - www.
  - en.
  - es.
  - de.

# Directory
html_dir: html
static_dir: static

# Home page post selection
index:
  limit: 3
  tag: article

# Date format (strftime)
date_format: '%Y-%m-%d'
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Base layout: every page plugs its content fragment into this shell
    let base = r#"<!DOCTYPE html>
<html lang="{{ site.language }}">
<head>
  <meta charset="utf-8">
  <title>{{ site.title }}</title>
</head>
<body>
{% include "content" %}
</body>
</html>
"#;
    fs::write(target_dir.join("html/base.tmpl.html"), base)?;

    // Pages
    let index_page = r#"<main>
  <h1>{{ site.title }}</h1>
  <p>{{ site.description }}</p>
  <ul>
  {% for post in posts %}
    <li><a href="{{ post.path }}">{{ post.title }}</a> <time>{{ post.date }}</time></li>
  {% endfor %}
  </ul>
</main>
"#;
    fs::write(target_dir.join("html/pages/index.tmpl.html"), index_page)?;

    let posts_page = r#"<main>
  <h1>Posts</h1>
  <ul>
  {% for post in posts %}
    <li>
      <a href="{{ post.path }}">{{ post.title }}</a>
      <time>{{ post.date | date_format(format="%B %d, %Y") }}</time>
      {% if post.summary %}<p>{{ post.summary }}</p>{% endif %}
    </li>
  {% endfor %}
  </ul>
</main>
"#;
    fs::write(target_dir.join("html/pages/posts.tmpl.html"), posts_page)?;

    let about_page = r#"<main>
  <h1>About</h1>
  <p>Written by {{ site.author }}.</p>
</main>
"#;
    fs::write(target_dir.join("html/pages/about.tmpl.html"), about_page)?;

    // Error pages
    let error_404 = r#"{% include "partials/error_meta" %}
{% include "partials/error_header" %}
<main>
  <h1>Page not found</h1>
  <p>The page you asked for does not exist.</p>
</main>
"#;
    fs::write(target_dir.join("html/errors/404.tmpl.html"), error_404)?;

    let error_500 = r#"{% include "partials/error_meta" %}
{% include "partials/error_header" %}
<main>
  <h1>Something went wrong</h1>
  <p>The server hit an internal error. Try again later.</p>
</main>
"#;
    fs::write(target_dir.join("html/errors/500.tmpl.html"), error_500)?;

    // Shared partials
    fs::write(
        target_dir.join("html/partials/error_meta.tmpl.html"),
        "<meta name=\"robots\" content=\"noindex\">\n",
    )?;
    fs::write(
        target_dir.join("html/partials/error_header.tmpl.html"),
        "<header><a href=\"/\">{{ site.title }}</a></header>\n",
    )?;
    fs::write(
        target_dir.join("html/partials/post_header.tmpl.html"),
        "<header><a href=\"/\">{{ site.title }}</a> / <a href=\"/posts\">posts</a></header>\n",
    )?;

    // Tag page for the default home-page tag
    let tag_page = r#"<main>
  <h1>Articles</h1>
  <ul>
  {% for post in posts %}
    <li><a href="{{ post.path }}">{{ post.title }}</a> <time>{{ post.date }}</time></li>
  {% endfor %}
  </ul>
</main>
"#;
    fs::write(target_dir.join("html/tags/article.tmpl.html"), tag_page)?;

    // A sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags:
  - article
summary: Your very first post.
---

{{% include "partials/post_header" %}}
<article>
  <h1>Hello World</h1>
  <p>Welcome to vellum. Edit this fragment under html/posts/ or add new
  ones; the server picks them up on the next request.</p>
</article>
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(
        target_dir.join("html/posts/hello-world.tmpl.html"),
        sample_post,
    )?;

    Ok(())
}

/// Run the init command with an existing vellum instance
pub fn run(vellum: &Vellum) -> Result<()> {
    init_site(&vellum.base_dir)
}
