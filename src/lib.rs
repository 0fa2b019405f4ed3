//! docroot - Static File Server
//!
//! Core library for serving files from a document root over HTTP/1.1.

pub mod config;
pub mod http;
pub mod server;
