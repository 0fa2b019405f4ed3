//! HTTP protocol implementation.
//!
//! This module implements the request-to-response pipeline of a static file
//! server. Every connection carries exactly one request and is closed after
//! the response.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Extracts the request line from the bytes of one read
//! - **`request`**: HTTP request representation
//! - **`path`**: Maps request paths onto the document root
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: The 200 and 404 responses and their builder
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read
//!        └──────┬──────┘
//!               │ Request line parsed      (empty read / bad request → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve path, open file, build response
//!        └──────┬───────────┘
//!               │ 200 or 404 ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Header block, then body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
