//! # TCP Connection Abstraction
//!
//! Wraps a TCP stream with the two framings used by the exchange:
//!
//! ```text
//! increment:  [4 bytes: i32, big-endian]
//! text:       [up to 1024 bytes ending in '\n']
//! ```
//!
//! Reads go through a buffered reader so a text line can be consumed without
//! losing bytes that arrived after it. Writes are flushed immediately.

use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::error::{ExchangeError, Result};
use super::messages::{decode_value, encode_value, MAX_TEXT_LEN, VALUE_LEN};

/// TCP connection wrapper with value and line framing.
///
/// The connection owns its stream; dropping it closes the socket.
pub struct Connection {
    /// Underlying TCP stream, buffered for reads
    stream: BufReader<TcpStream>,
}

impl Connection {
    /// Create a new Connection from an established TCP stream.
    ///
    /// # Example
    /// ```ignore
    /// let stream = TcpStream::connect("127.0.0.1:5000").await?;
    /// let mut conn = Connection::new(stream);
    /// ```
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Read one 4-byte value.
    ///
    /// # Returns
    /// - `Ok(Some(value))`: a full value was received
    /// - `Ok(None)`: the peer closed the stream cleanly between values
    /// - `Err(UnexpectedEof)`: the stream ended partway through a value
    /// - `Err(Io)`: any other I/O error
    pub async fn read_value(&mut self) -> Result<Option<i32>> {
        let mut buf = [0u8; VALUE_LEN];
        let mut filled = 0;

        while filled < VALUE_LEN {
            let n = self.stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(ExchangeError::UnexpectedEof { received: filled });
            }
            filled += n;
        }

        let value = decode_value(buf);
        debug!("⬅️  received value {}", value);
        Ok(Some(value))
    }

    /// Write one 4-byte value and flush it.
    pub async fn write_value(&mut self, value: i32) -> Result<()> {
        self.stream.write_all(&encode_value(value)).await?;
        self.stream.flush().await?;
        debug!("➡️  sent value {}", value);
        Ok(())
    }

    /// Read one line of text, at most [`MAX_TEXT_LEN`] bytes.
    ///
    /// Reading stops after the first `\n`, once the buffer is full, or at end of
    /// stream. The returned bytes keep the terminator if one was read.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))`: at least one byte was received
    /// - `Ok(None)`: the peer closed the stream without sending anything
    pub async fn read_text(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(MAX_TEXT_LEN);
        let n = (&mut self.stream)
            .take(MAX_TEXT_LEN as u64)
            .read_until(b'\n', &mut buf)
            .await?;

        if n == 0 {
            return Ok(None);
        }

        debug!("⬅️  received {} bytes of text", n);
        Ok(Some(buf))
    }

    /// Write raw text bytes and flush them.
    pub async fn write_text(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        debug!("➡️  sent {} bytes of text", bytes.len());
        Ok(())
    }

    /// Wait until the peer closes the stream.
    ///
    /// Used after sending the sentinel, which the server never answers. Any bytes
    /// that still arrive are discarded.
    pub async fn wait_for_close(&mut self) -> Result<()> {
        let mut scratch = [0u8; 64];
        loop {
            let n = self.stream.read(&mut scratch).await?;
            if n == 0 {
                return Ok(());
            }
            warn!("⚠️  discarding {} unexpected bytes after the sentinel", n);
        }
    }
}
