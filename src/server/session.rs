//! # Server Session
//!
//! One session is everything the server does with one accepted connection.
//! The session only knows the exchange itself; binding, accepting and closing
//! belong to [`Server`](super::server::Server).

use log::{info, warn};

use crate::common::config::ExchangeMode;
use crate::common::connection::Connection;
use crate::common::error::Result;
use crate::common::messages::{self, Step};

use super::config::TextReply;

/// What happened during a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Values answered (increment) or lines answered (text)
    pub exchanged: u64,
    /// True when the client ended the increment exchange with the sentinel
    pub terminated_by_sentinel: bool,
}

/// Run the exchange selected by `mode` on an accepted connection.
pub async fn run(
    conn: &mut Connection,
    mode: ExchangeMode,
    reply: &TextReply,
) -> Result<SessionSummary> {
    match mode {
        ExchangeMode::Increment => run_increment(conn).await,
        ExchangeMode::Text => run_text(conn, reply).await,
    }
}

/// Answer every received value with its successor until the sentinel arrives.
///
/// The sentinel gets no reply. A peer that disconnects before sending it also
/// ends the session.
pub async fn run_increment(conn: &mut Connection) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    loop {
        let Some(value) = conn.read_value().await? else {
            warn!("⚠️  Client disconnected before sending the sentinel");
            break;
        };

        match messages::step(value) {
            Step::Continue(reply) => {
                conn.write_value(reply).await?;
                summary.exchanged += 1;
            }
            Step::Stop => {
                info!("🛑 Sentinel received after {} values", summary.exchanged);
                summary.terminated_by_sentinel = true;
                break;
            }
        }
    }

    Ok(summary)
}

/// Read one line and answer it once.
pub async fn run_text(conn: &mut Connection, reply: &TextReply) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    let Some(line) = conn.read_text().await? else {
        warn!("⚠️  Client disconnected without sending a message");
        return Ok(summary);
    };

    info!(
        "💬 Client says: {}",
        messages::trim_line(&String::from_utf8_lossy(&line))
    );

    match reply {
        TextReply::Echo => conn.write_text(&line).await?,
        TextReply::Fixed(text) => {
            let mut answer = text.clone().into_bytes();
            answer.push(b'\n');
            conn.write_text(&answer).await?;
        }
    }
    summary.exchanged = 1;

    Ok(summary)
}
