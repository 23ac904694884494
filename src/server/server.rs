//! # Server - Listening Endpoint
//!
//! Owns the listening socket and hands accepted connections to a
//! [`session`](super::session).
//!
//! Two ways to run it:
//!
//! - [`Server::run_once`]: accept exactly one client, run its session, close
//!   everything. This is the default and what the binary does without
//!   `--concurrent`.
//! - [`Server::serve`]: accept in a loop, one task per client, until the shutdown
//!   channel fires.
//!
//! Setup is split into the same steps a socket goes through
//! (`create → bind → listen`) so each failure is reported with its own
//! [`ExchangeError`] variant.

use std::net::{IpAddr, SocketAddr};

use log::{error, info, warn};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::common::config::ExchangeMode;
use crate::common::connection::Connection;
use crate::common::error::{ExchangeError, Result};

use super::config::{ServerSettings, TextReply};
use super::session::{self, SessionSummary};

/// A bound and listening server.
pub struct Server {
    listener: TcpListener,
    settings: ServerSettings,
}

impl Server {
    /// Create the socket, bind it to `host:port` and start listening.
    ///
    /// Must be called from inside a tokio runtime.
    ///
    /// # Errors
    /// - `MultilineReply` / `TextTooLong`: the fixed text reply cannot be sent as one line
    /// - `Address`: `host` is not an IP address
    /// - `SocketCreate`: the OS refused to create a socket
    /// - `Bind`: the address is unavailable, e.g. the port is already in use
    /// - `Listen`: the socket could not enter listening mode
    ///
    /// Any socket created before the failing step is closed on return.
    pub fn bind(settings: ServerSettings) -> Result<Self> {
        settings.text_reply.validate()?;

        let ip: IpAddr = settings
            .host
            .parse()
            .map_err(|source| ExchangeError::Address {
                host: settings.host.clone(),
                source,
            })?;
        let addr = SocketAddr::new(ip, settings.port);

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(ExchangeError::SocketCreate)?;

        socket
            .bind(addr)
            .map_err(|source| ExchangeError::Bind { addr, source })?;

        let listener = socket
            .listen(settings.backlog)
            .map_err(|source| ExchangeError::Listen { addr, source })?;

        Ok(Self { listener, settings })
    }

    /// Address actually bound (resolves port `0` to the chosen port).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Accept one connection, run its session and close it.
    pub async fn run_once(self) -> Result<SessionSummary> {
        self.log_listening();

        let (stream, addr) = self.listener.accept().await.map_err(ExchangeError::Accept)?;
        info!("🔗 Connection accepted from {}", addr);

        let mut conn = Connection::new(stream);
        let summary = session::run(&mut conn, self.settings.mode, &self.settings.text_reply).await?;

        drop(conn);
        info!("🔌 Connection closed after {} exchanges", summary.exchanged);

        Ok(summary)
    }

    /// Accept connections until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// Each connection runs in its own task. Accept errors are logged and the
    /// loop keeps going. Sessions still running at shutdown are aborted.
    ///
    /// # Returns
    /// Number of connections accepted.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<u64> {
        self.log_listening();

        let mut accepted = 0u64;
        let mut sessions = JoinSet::new();

        if *shutdown.borrow() {
            return Ok(accepted);
        }

        loop {
            tokio::select! {
                result = self.listener.accept() => match result {
                    Ok((stream, addr)) => {
                        accepted += 1;
                        info!("🔗 Connection #{} accepted from {}", accepted, addr);

                        let mode = self.settings.mode;
                        let reply = self.settings.text_reply.clone();
                        sessions.spawn(handle_connection(stream, addr, mode, reply));
                    }
                    Err(e) => error!("❌ Accept error: {}", e),
                },
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        error!("❌ Session task failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        if !sessions.is_empty() {
            warn!("⚠️  Shutting down with {} sessions still open", sessions.len());
        }
        sessions.shutdown().await;
        info!("🛑 Server stopped after {} connections", accepted);

        Ok(accepted)
    }

    fn log_listening(&self) {
        match self.listener.local_addr() {
            Ok(addr) => info!(
                "📡 Waiting for connections on {} ({} mode)",
                addr, self.settings.mode
            ),
            Err(e) => warn!("⚠️  Listening, but the local address is unknown: {}", e),
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    mode: ExchangeMode,
    reply: TextReply,
) {
    let mut conn = Connection::new(stream);

    match session::run(&mut conn, mode, &reply).await {
        Ok(summary) => info!(
            "🔌 Connection from {} closed after {} exchanges",
            addr, summary.exchanged
        ),
        Err(e) => error!(
            "❌ Session with {} failed: {:#}",
            addr,
            anyhow::Error::new(e)
        ),
    }
}
