use std::time::SystemTime;

pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Fixed page sent when the requested file cannot be opened.
pub const NOT_FOUND_BODY: &[u8] = b"<html><body><h1>404 Not Found</h1></body></html>";

/// HTTP status codes the server emits.
///
/// - `Ok` (200): file found and sent
/// - `NotFound` (404): file could not be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Size and content type of a file about to be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub mime_type: &'static str,
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep their insertion order, which is also the order they go out
/// on the wire.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as ordered name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Unlike many builders this one never adds headers on its own; a
/// `Content-Length` is only present if the caller sets it.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/css")
///     .body(b"body {}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header, or replaces the value of an existing one in place.
    ///
    /// Names are compared case-insensitively.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates the 200 response for a file.
    ///
    /// `Content-Length` is taken from `meta`, which must describe `body`.
    pub fn found(meta: FileMetadata, body: Vec<u8>, now: SystemTime) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Date", httpdate::fmt_http_date(now))
            .header("Content-Type", meta.mime_type)
            .header("Content-Length", meta.size_bytes.to_string())
            .header("Connection", "close")
            .body(body)
            .build()
    }

    /// Creates the fixed 404 response.
    ///
    /// No `Content-Length` is sent; the client sees the end of the body when
    /// the connection closes.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/html")
            .body(NOT_FOUND_BODY.to_vec())
            .build()
    }

    /// Looks up a header value by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The status line without its trailing CRLF, e.g. `HTTP/1.1 200 OK`.
    pub fn status_line(&self) -> String {
        format!(
            "{} {} {}",
            HTTP_VERSION,
            self.status.as_u16(),
            self.status.reason_phrase()
        )
    }
}
