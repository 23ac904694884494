//! # Console Drivers
//!
//! Interactive front-ends for the two exchanges. Input and output are generic so
//! the binaries can pass stdin/stdout and tests can pass byte buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::error::Result;
use crate::common::messages::{self, SENTINEL};

use super::client::Client;

pub const NUMBER_PROMPT: &str = "Enter a number (0 to quit): ";
pub const MESSAGE_PROMPT: &str = "Enter a message for the server: ";

/// Prompt for integers and exchange them until `0` is entered.
///
/// Lines that are not integers are reported and prompted again. End of input
/// sends the sentinel.
///
/// # Returns
/// Number of values answered by the server (the sentinel is not counted).
pub async fn run_increment<R, W>(client: &mut Client, input: R, output: &mut W) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut exchanged = 0;

    loop {
        output.write_all(NUMBER_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let value = match lines.next_line().await? {
            Some(line) => match line.trim().parse::<i32>() {
                Ok(value) => value,
                Err(_) => {
                    let notice = format!("'{}' is not a valid integer\n", line.trim());
                    output.write_all(notice.as_bytes()).await?;
                    continue;
                }
            },
            None => SENTINEL,
        };

        match client.exchange(value).await? {
            Some(reply) => {
                output
                    .write_all(format!("Server replied: {}\n", reply).as_bytes())
                    .await?;
                exchanged += 1;
            }
            None => {
                output.write_all(b"Disconnected from server.\n").await?;
                break;
            }
        }
    }

    output.flush().await?;
    Ok(exchanged)
}

/// Prompt for one line, send it and print the answer.
///
/// End of input sends an empty line.
pub async fn run_text<R, W>(client: &mut Client, mut input: R, output: &mut W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(MESSAGE_PROMPT.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;

    let answer = client.send_text(&line).await?;
    output
        .write_all(format!("Server replied: {}\n", messages::trim_line(&answer)).as_bytes())
        .await?;
    output.flush().await?;

    Ok(answer)
}
