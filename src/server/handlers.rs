//! Request handlers and the fallback render cascade
//!
//! Every page is rendered through [`respond`]: a failed render degrades to
//! the 404 page, then to the 500 page, and finally to a plain-text response
//! that cannot fail. Errors are logged where they are detected.

use axum::{
    extract::{Host, Path, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tera::Context;

use super::{redirect, ServerState};
use crate::render::{self, RenderError};

type AppState = Arc<ServerState>;

/// Fragment list for a page: layout first, content second, partials after
fn fragments(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// GET / - home page with the most recent tagged posts
pub(crate) async fn index(
    State(state): State<AppState>,
    host: Option<Host>,
    uri: Uri,
) -> Response {
    if let Some(target) = locale_redirect(&state, host.as_ref(), &uri) {
        return found(target);
    }

    let posts = match state
        .store
        .select(state.config.index.limit, &state.config.index.tag)
    {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("post selection failed: {}", e);
            return internal_error(&state);
        }
    };

    let context = render::page_context(&state.config, &posts);
    respond(&state, fragments(&["base", "pages/index"]), &context)
}

/// GET /posts - listing of all posts
pub(crate) async fn posts_index(State(state): State<AppState>) -> Response {
    let posts = match state.store.select(0, "") {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("post selection failed: {}", e);
            return internal_error(&state);
        }
    };

    let context = render::page_context(&state.config, &posts);
    respond(&state, fragments(&["base", "pages/posts"]), &context)
}

/// GET /posts/{slug} - a single post page
///
/// The slug is used directly as a fragment name with no existence check;
/// an unknown slug falls through to the 404 fallback.
pub(crate) async fn post_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let context = render::page_context(&state.config, &[]);
    respond(
        &state,
        vec![
            "base".to_string(),
            format!("posts/{}", slug),
            "partials/post_header".to_string(),
        ],
        &context,
    )
}

/// GET /tags/{tag} - posts carrying the given tag
pub(crate) async fn tag_page(State(state): State<AppState>, Path(tag): Path<String>) -> Response {
    let posts = match state.store.select(0, &tag) {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("post selection failed: {}", e);
            return internal_error(&state);
        }
    };

    let context = render::page_context(&state.config, &posts);
    respond(
        &state,
        vec!["base".to_string(), format!("tags/{}", slug::slugify(&tag))],
        &context,
    )
}

/// Fallback: GET /{page} - a static page fragment
pub(crate) async fn static_page(
    State(state): State<AppState>,
    host: Option<Host>,
    uri: Uri,
) -> Response {
    // /posts/ lands here because a slug segment cannot be empty
    if uri.path() == "/posts/" {
        return (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, "/posts".to_string())],
        )
            .into_response();
    }

    if let Some(target) = locale_redirect(&state, host.as_ref(), &uri) {
        return found(target);
    }

    let page = uri.path().trim_start_matches('/');
    if page.is_empty() || page.contains('/') || page.contains('.') {
        return not_found(&state);
    }

    let context = render::page_context(&state.config, &[]);
    respond(
        &state,
        vec!["base".to_string(), format!("pages/{}", page)],
        &context,
    )
}

/// Locale policy for handlers that live on a subdomain
fn locale_redirect(state: &ServerState, host: Option<&Host>, uri: &Uri) -> Option<String> {
    let Host(host) = host?;
    redirect::redirect_target(&state.config.locale_prefixes, host, uri)
}

/// 302 Found
fn found(target: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

/// Render a page, degrading through the fallback cascade on failure
///
/// A missing fragment means the page does not exist (404); anything else is
/// an internal error (500).
fn respond(state: &ServerState, fragments: Vec<String>, context: &Context) -> Response {
    match state.renderer.render(&fragments, context) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(err @ RenderError::NotFound(_)) => {
            tracing::warn!("page render failed: {}", err);
            not_found(state)
        }
        Err(err) => {
            tracing::error!("page render failed: {}", err);
            internal_error(state)
        }
    }
}

/// Render the 404 page, degrading to the 500 fallback on failure
pub(crate) fn not_found(state: &ServerState) -> Response {
    let context = render::page_context(&state.config, &[]);
    match state.renderer.render(&error_fragments("errors/404"), &context) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("404 fallback render failed: {}", err);
            internal_error(state)
        }
    }
}

/// Render the 500 page, degrading to plain text on failure
///
/// The plain-text response is the terminal state of the cascade and never
/// fails.
pub(crate) fn internal_error(state: &ServerState) -> Response {
    let context = render::page_context(&state.config, &[]);
    match state.renderer.render(&error_fragments("errors/500"), &context) {
        Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("500 fallback render failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Fragment list for an error page
fn error_fragments(content: &str) -> Vec<String> {
    vec![
        "base".to_string(),
        content.to_string(),
        "partials/error_meta".to_string(),
        "partials/error_header".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::commands::init::init_site;
    use crate::server::router;
    use crate::Vellum;

    fn test_site() -> (TempDir, Router) {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        let vellum = Vellum::new(tmp.path()).unwrap();
        (tmp, router(&vellum))
    }

    fn get(path: &str, host: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[tokio::test]
    async fn test_index_renders() {
        let (_tmp, app) = test_site();

        let response = app.oneshot(get("/", "www.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let body = body_text(response).await;
        assert!(body.contains("Hello World"));
    }

    #[tokio::test]
    async fn test_bare_host_redirects_with_path_and_query() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/about?lang=en", "example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://www.example.com/about?lang=en"
        );
    }

    #[tokio::test]
    async fn test_posts_trailing_slash_redirects() {
        let (_tmp, app) = test_site();

        let response = app.oneshot(get("/posts/", "www.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/posts");
    }

    #[tokio::test]
    async fn test_posts_listing_renders() {
        let (_tmp, app) = test_site();

        let response = app.oneshot(get("/posts", "www.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("/posts/hello-world"));
    }

    #[tokio::test]
    async fn test_post_page_renders() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/posts/hello-world", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<article>"));
    }

    #[tokio::test]
    async fn test_unknown_post_is_fallback_404() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/posts/no-such-post", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_unknown_page_is_fallback_404() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/no-such-page", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_tag_page_filters_posts() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/tags/article", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Hello World"));
    }

    #[tokio::test]
    async fn test_missing_post_source_is_500() {
        let (tmp, app) = test_site();
        fs::remove_dir_all(tmp.path().join("html/posts")).unwrap();

        let response = app.oneshot(get("/", "www.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_broken_fallbacks_degrade_to_plain_text() {
        let (tmp, app) = test_site();
        fs::remove_file(tmp.path().join("html/errors/404.tmpl.html")).unwrap();
        fs::remove_file(tmp.path().join("html/errors/500.tmpl.html")).unwrap();

        let response = app
            .oneshot(get("/no-such-page", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));
        let body = body_text(response).await;
        assert_eq!(body, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_multi_segment_path_is_404() {
        let (_tmp, app) = test_site();

        let response = app
            .oneshot(get("/a/b/c", "www.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
