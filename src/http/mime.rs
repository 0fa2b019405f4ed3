//! Content-type inference from file extensions.

/// Content type sent for anything the table does not know.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Returns the content type for a resolved file path.
///
/// Only the text after the last `.` of the whole path is inspected, matched
/// case-sensitively against a closed table. A path with no `.` at all is
/// treated as HTML.
///
/// # Example
///
/// ```
/// # use docroot::http::mime::mime_for_path;
/// assert_eq!(mime_for_path("htdocs/style.css"), "text/css");
/// assert_eq!(mime_for_path("htdocs/archive.tar.gz"), "application/octet-stream");
/// assert_eq!(mime_for_path("htdocs/README"), "text/html");
/// ```
pub fn mime_for_path(path: &str) -> &'static str {
    let Some(dot) = path.rfind('.') else {
        return "text/html";
    };

    match &path[dot + 1..] {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_taken_after_last_dot_of_whole_path() {
        assert_eq!(mime_for_path("htdocs/a.b/c"), FALLBACK_MIME);
        assert_eq!(mime_for_path("htdocs/v1.2/app.js"), "application/javascript");
    }
}
