use crate::http::request::Request;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace arrived
    Empty,
    /// Fewer than three tokens; names the first one missing
    MissingToken(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty request"),
            ParseError::MissingToken(name) => write!(f, "request line has no {}", name),
        }
    }
}

impl std::error::Error for ParseError {}

/// Extracts method, path and version from whatever one read delivered.
///
/// Tokens are split on ASCII whitespace over the whole buffer, so line
/// breaks count as separators too. Anything after the third token
/// (headers, body) is ignored. Invalid UTF-8 is replaced, not rejected.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, ParseError> {
    let text = String::from_utf8_lossy(buf);
    let mut parts = text.split_ascii_whitespace();

    let method = parts.next().ok_or(ParseError::Empty)?;
    let path = parts.next().ok_or(ParseError::MissingToken("path"))?;
    let version = parts.next().ok_or(ParseError::MissingToken("version"))?;

    Ok(Request::new(method, path, version))
}
