//! # Request Server
//!
//! Accepts TCP connections and answers one discovery request per connection.
//!
//! Each connection runs in its own task: a single read of up to
//! `recv_buffer` bytes, one scan, one response, then the connection is
//! closed. The scan itself runs in a nested task so that even a panic inside
//! it still produces an error line for the client. A failing connection
//! never touches the accept loop or any other connection.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hostsweep_common::config::Config;
use hostsweep_common::response::Response;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::discovery::DiscoveryService;
use crate::prober::Prober;

/// Per-connection limits, copied out of [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub recv_buffer: usize,
    pub read_timeout: Duration,
}

impl From<&Config> for ConnectionLimits {
    fn from(cfg: &Config) -> Self {
        Self {
            recv_buffer: cfg.recv_buffer.max(1),
            read_timeout: cfg.read_timeout,
        }
    }
}

/// Counts connections that are still being handled.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGauge {
    active: Arc<AtomicUsize>,
}

impl ConnectionGauge {
    /// Registers a connection and returns the new count with its guard.
    pub fn enter(&self) -> (usize, ActiveConnection) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = ActiveConnection {
            active: Arc::clone(&self.active),
        };
        (now, guard)
    }

    pub fn current(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Leaves the gauge when dropped, whatever way the connection task ends.
#[derive(Debug)]
pub struct ActiveConnection {
    active: Arc<AtomicUsize>,
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct RequestServer<P> {
    listener: TcpListener,
    service: Arc<DiscoveryService<P>>,
    limits: ConnectionLimits,
    gauge: ConnectionGauge,
}

impl<P: Prober> RequestServer<P> {
    /// Binds to `cfg.listen`.
    pub async fn bind(cfg: &Config, service: DiscoveryService<P>) -> io::Result<Self> {
        let listener = TcpListener::bind(cfg.listen).await?;
        Ok(Self {
            listener,
            service: Arc::new(service),
            limits: ConnectionLimits::from(cfg),
            gauge: ConnectionGauge::default(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until the process ends.
    pub async fn run(self) -> io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes. Connections already accepted keep
    /// running to completion in their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Listening on {}", self.local_addr()?);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Listener stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let (active, guard) = self.gauge.enter();
                            info!("New connection from {peer} ({active} active)");
                            let service = Arc::clone(&self.service);
                            let limits = self.limits;
                            tokio::spawn(async move {
                                let _guard = guard;
                                match handle_connection(stream, service, limits).await {
                                    Ok(Some(response)) if response.is_error() => {
                                        info!("{peer}: error response sent");
                                    }
                                    Ok(Some(_)) => info!("{peer}: response sent"),
                                    Ok(None) => info!("{peer}: disconnected without sending a request"),
                                    Err(e) => warn!("{peer}: connection failed: {e}"),
                                }
                                debug!("Connection with {peer} closed");
                            });
                        }
                        // Usually transient, e.g. running out of file descriptors.
                        Err(e) => warn!("Failed to accept a connection: {e}"),
                    }
                }
            }
        }
    }
}

/// Reads one request from `stream`, answers it and shuts the write side down.
///
/// Returns `None` when the peer closed the connection without sending
/// anything. A peer that stays silent past `read_timeout` yields
/// [`io::ErrorKind::TimedOut`].
pub async fn handle_connection<S, P>(
    mut stream: S,
    service: Arc<DiscoveryService<P>>,
    limits: ConnectionLimits,
) -> io::Result<Option<Response>>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: Prober,
{
    let mut buf = vec![0u8; limits.recv_buffer];
    let read = match timeout(limits.read_timeout, stream.read(&mut buf)).await {
        Ok(read) => read?,
        Err(_) => {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "no request received in time",
            ));
        }
    };

    if read == 0 {
        return Ok(None);
    }

    buf.truncate(read);
    let response = match tokio::spawn(async move { service.respond(&buf).await }).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request handling failed: {e}");
            Response::Fault("internal error".to_string())
        }
    };

    stream.write_all(response.render().as_bytes()).await?;
    stream.shutdown().await?;
    Ok(Some(response))
}
