use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::http::connection::Connection;

/// Owns the listening socket and hands accepted connections to
/// [`Connection`] tasks.
pub struct Listener {
    listener: TcpListener,
    config: Arc<Config>,
    permits: Arc<Semaphore>,
}

impl Listener {
    /// Creates, binds and starts listening on the configured address.
    ///
    /// Any failure here is fatal to the server.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        let addr: SocketAddr = tokio::net::lookup_host(&config.listen_addr)
            .await
            .with_context(|| format!("cannot resolve {}", config.listen_addr))?
            .next()
            .with_context(|| format!("no address for {}", config.listen_addr))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .context("socket failed")?;

        socket
            .set_reuseaddr(true)
            .context("setting SO_REUSEADDR failed")?;
        socket.bind(addr).context("bind failed")?;
        let listener = socket.listen(config.backlog).context("listen failed")?;

        let port = listener.local_addr()?.port();
        info!("Server running on http://localhost:{}", port);
        if Path::new(&config.doc_root).is_absolute() {
            info!("Serving files from {}/", config.doc_root);
        } else {
            info!("Serving files from ./{}/", config.doc_root);
        }

        Ok(Self {
            listener,
            permits: Arc::new(Semaphore::new(config.max_connections)),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    ///
    /// A permit is taken before each accept, so once `max_connections`
    /// handlers are running further clients wait in the OS backlog.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            let permit = self
                .permits
                .clone()
                .acquire_owned()
                .await
                .context("connection limiter closed")?;

            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("accept failed: {}", e);
                    continue;
                }
            };
            debug!("Accepted connection from {}", peer);

            let config = self.config.clone();
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, config).with_peer(peer);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {}", peer, e);
                }
                drop(permit);
            });
        }
    }
}
