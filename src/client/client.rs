//! # Client Core
//!
//! Connects to a server and performs single exchanges on request. The client
//! holds no state besides its connection; deciding which values or lines to
//! send is left to the caller (see [`console`](super::console)).
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut client = Client::connect("127.0.0.1", 5000).await?;
//! assert_eq!(client.exchange(5).await?, Some(6));
//! assert_eq!(client.exchange(0).await?, None); // server closes
//! ```

use log::info;
use tokio::net::TcpStream;

use crate::common::connection::Connection;
use crate::common::error::{ExchangeError, Result};
use crate::common::messages::{self, SENTINEL};

/// A connected client.
pub struct Client {
    /// `host:port` the client connected to, for logging
    server: String,
    conn: Connection,
}

impl Client {
    /// Open a connection to `host:port`.
    ///
    /// `host` may be an IP address or a resolvable name.
    ///
    /// # Errors
    /// `Connect` when nothing is listening there or the host cannot be reached.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let server = format!("{}:{}", host, port);

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| ExchangeError::Connect {
                addr: server.clone(),
                source,
            })?;

        info!("🤝 Connected to server {}", server);

        Ok(Self {
            server,
            conn: Connection::new(stream),
        })
    }

    /// Send one value and wait for the server's answer.
    ///
    /// # Returns
    /// - `Ok(Some(reply))` for a non-zero value
    /// - `Ok(None)` for the sentinel, once the server has closed the connection
    ///
    /// # Errors
    /// `Closed` if the server hangs up instead of answering a non-zero value.
    pub async fn exchange(&mut self, value: i32) -> Result<Option<i32>> {
        self.conn.write_value(value).await?;

        if value == SENTINEL {
            self.conn.wait_for_close().await?;
            info!("🔌 Server {} closed the connection", self.server);
            return Ok(None);
        }

        match self.conn.read_value().await? {
            Some(reply) => Ok(Some(reply)),
            None => Err(ExchangeError::Closed),
        }
    }

    /// Send one line of text and return the server's answer.
    ///
    /// A missing trailing newline is added before sending. The answer is read up
    /// to its newline (or 1024 bytes) and decoded lossily as UTF-8.
    ///
    /// # Errors
    /// - `TextTooLong` before anything is sent if the line exceeds the buffer
    /// - `Closed` if the server hangs up without answering
    pub async fn send_text(&mut self, line: &str) -> Result<String> {
        let frame = messages::text_frame(line)?;
        self.conn.write_text(&frame).await?;

        match self.conn.read_text().await? {
            Some(answer) => Ok(String::from_utf8_lossy(&answer).into_owned()),
            None => Err(ExchangeError::Closed),
        }
    }
}
