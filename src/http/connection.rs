use std::io::SeekFrom;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::mime::mime_for_path;
use crate::http::parser::parse_request_line;
use crate::http::path::resolve;
use crate::http::request::Request;
use crate::http::response::{FileMetadata, Response};
use crate::http::writer::ResponseWriter;

pub struct Connection<S> {
    stream: S,
    config: Arc<Config>,
    peer: Option<SocketAddr>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, Request, String), // String = outcome for the access log
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            config,
            peer: None,
            state: ConnectionState::Reading,
        }
    }

    /// Records the remote address for the access log.
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Drives the connection from the first read to the close.
    ///
    /// Exactly one response is sent at most; every path ends in `Closed`,
    /// after which the write side is shut down. An `Err` means the
    /// connection was dropped part way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown after response failed: {}", e);
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, outcome) = self.handle_request(&req).await?;
                    let writer = ResponseWriter::new(response);
                    self.state = ConnectionState::Writing(writer, req, outcome);
                }

                ConnectionState::Writing(writer, req, outcome) => {
                    timeout(
                        self.config.write_timeout,
                        writer.write_to_stream(&mut self.stream),
                    )
                    .await
                    .map_err(|_| anyhow::anyhow!("write timed out"))??;

                    info!(
                        method = %req.method,
                        path = %req.path,
                        status = writer.status().as_u16(),
                        peer = ?self.peer,
                        "[{} {}] {}",
                        req.method,
                        req.path,
                        outcome
                    );
                    // never kept alive
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Takes a single read off the stream and parses its request line.
    ///
    /// Returns `None` when the client sent nothing, timed out, or sent
    /// something with fewer than three tokens: the connection is then closed
    /// without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buf = BytesMut::zeroed(self.config.read_buffer_size);

        let n = match timeout(self.config.read_timeout, self.stream.read(&mut buf[..])).await {
            Ok(res) => res?,
            Err(_) => {
                warn!("Timed out waiting for request");
                return Ok(None);
            }
        };

        if n == 0 {
            // Client closed connection
            debug!("Client closed before sending a request");
            return Ok(None);
        }

        buf.truncate(n);

        match parse_request_line(&buf) {
            Ok(req) => Ok(Some(req)),
            Err(e) => {
                warn!("Bad request: {}", e);
                Ok(None)
            }
        }
    }

    async fn handle_request(&self, req: &Request) -> anyhow::Result<(Response, String)> {
        let fs_path = resolve(&self.config.doc_root, &req.path);

        let Some(mut file) = open_regular_file(&fs_path).await else {
            return Ok((Response::not_found(), "-> 404".to_string()));
        };

        let size_bytes = file.seek(SeekFrom::End(0)).await?;
        file.seek(SeekFrom::Start(0)).await?;

        let mut body = vec![0u8; usize::try_from(size_bytes)?];
        file.read_exact(&mut body).await?;

        let meta = FileMetadata {
            size_bytes,
            mime_type: mime_for_path(&fs_path),
        };
        let outcome = format!("-> 200 {} ({} bytes)", meta.mime_type, meta.size_bytes);

        Ok((Response::found(meta, body, SystemTime::now()), outcome))
    }
}

/// Opens `path` read-only. Any failure counts as a miss, and so does a
/// directory.
async fn open_regular_file(path: &str) -> Option<File> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            debug!(path, "Open failed: {}", e);
            return None;
        }
    };

    match file.metadata().await {
        Ok(meta) if !meta.is_dir() => Some(file),
        Ok(_) => {
            debug!(path, "Resolved path is a directory");
            None
        }
        Err(e) => {
            debug!(path, "Stat failed: {}", e);
            None
        }
    }
}
