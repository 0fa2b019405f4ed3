/// The request line of a client request.
///
/// Only the first three whitespace-separated tokens of the request are kept.
/// None of them is validated: the method and version are carried along for
/// logging, and the path is handed to the path resolver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The request method as sent (e.g., "GET")
    pub method: String,
    /// The raw request path, including any query string (e.g., "/index.html?v=2")
    pub path: String,
    /// The protocol version as sent (e.g., "HTTP/1.1")
    pub version: String,
}

impl Request {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: version.into(),
        }
    }
}
