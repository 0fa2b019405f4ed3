//! Mapping of request paths onto the document root.
//!
//! Resolution is pure string manipulation: the filesystem is never consulted
//! and every input produces a path. Parent-directory segments such as `..`
//! are passed through verbatim, so a request can name files outside the
//! document root.

/// File served for a request to `/`.
pub const INDEX_FILE: &str = "index.html";

/// Extension appended to request paths that contain no `.`.
pub const DEFAULT_EXTENSION: &str = ".html";

/// Resolves a raw request path against `doc_root`.
///
/// Applied in order:
/// 1. everything from the first `?` onwards is dropped
/// 2. `/` maps to `<doc_root>/index.html`
/// 3. anything else is appended to `doc_root` as-is
/// 4. if the path has no `.`, `.html` is appended
///
/// # Example
///
/// ```
/// # use docroot::http::path::resolve;
/// assert_eq!(resolve("htdocs", "/"), "htdocs/index.html");
/// assert_eq!(resolve("htdocs", "/about?lang=en"), "htdocs/about.html");
/// assert_eq!(resolve("htdocs", "/logo.png"), "htdocs/logo.png");
/// ```
pub fn resolve(doc_root: &str, raw_path: &str) -> String {
    let path = match raw_path.find('?') {
        Some(q) => &raw_path[..q],
        None => raw_path,
    };

    if path == "/" {
        return format!("{}/{}", doc_root, INDEX_FILE);
    }

    let mut resolved =
        String::with_capacity(doc_root.len() + path.len() + DEFAULT_EXTENSION.len());
    resolved.push_str(doc_root);
    resolved.push_str(path);

    if !path.contains('.') {
        resolved.push_str(DEFAULT_EXTENSION);
    }

    resolved
}
