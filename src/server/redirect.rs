//! Locale host redirect policy
//!
//! Pages are served from locale subdomains (`www.`, `en.`, `es.`, `de.` by
//! default). A request arriving on a bare host is sent to the `www.` host
//! with path and query preserved.

use axum::http::Uri;

/// Compute the redirect target for a request, if any
///
/// Returns `None` when the host already starts with one of the allowed
/// prefixes, otherwise the absolute `www.` URL to redirect to.
pub fn redirect_target(prefixes: &[String], host: &str, uri: &Uri) -> Option<String> {
    if prefixes.iter().any(|p| host.starts_with(p.as_str())) {
        return None;
    }

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Some(format!("http://www.{}{}", host, path_and_query))
}
