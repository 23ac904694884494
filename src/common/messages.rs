//! # Exchange Protocol
//!
//! Defines what travels over the socket and how the server reacts to it.
//!
//! ## Increment exchange
//!
//! Every message is a signed 32-bit integer encoded as 4 bytes in network byte
//! order (big-endian). There is no length prefix:
//! ```text
//! [4 bytes: i32, big-endian]
//! ```
//! The server answers every non-zero value `n` with `n + 1`. The value `0` is the
//! sentinel that ends the exchange; it gets no reply.
//!
//! ## Text exchange
//!
//! A single line of raw bytes terminated by `\n`, at most [`MAX_TEXT_LEN`] bytes
//! including the terminator.

use super::error::{ExchangeError, Result};

/// Size in bytes of one encoded value.
pub const VALUE_LEN: usize = 4;

/// Capacity of the text buffer on both sides, newline included.
pub const MAX_TEXT_LEN: usize = 1024;

/// Value that terminates the increment exchange.
pub const SENTINEL: i32 = 0;

/// Encode a value for the wire.
pub fn encode_value(value: i32) -> [u8; VALUE_LEN] {
    value.to_be_bytes()
}

/// Decode a value read from the wire.
pub fn decode_value(bytes: [u8; VALUE_LEN]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// Outcome of processing one received value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Send `reply` back and keep reading.
    Continue(i32),
    /// Sentinel received: stop without replying.
    Stop,
}

/// Decide what the server does with a received value.
///
/// Wraps at `i32::MAX`, so `i32::MAX` is answered with `i32::MIN`.
pub fn step(value: i32) -> Step {
    if value == SENTINEL {
        Step::Stop
    } else {
        Step::Continue(value.wrapping_add(1))
    }
}

/// Turn a console line into the bytes sent by the text client.
///
/// The line is sent verbatim; a trailing `\n` is appended when missing.
pub fn text_frame(line: &str) -> Result<Vec<u8>> {
    let mut frame = line.as_bytes().to_vec();
    if !frame.ends_with(b"\n") {
        frame.push(b'\n');
    }

    if frame.len() > MAX_TEXT_LEN {
        return Err(ExchangeError::TextTooLong {
            len: frame.len(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(frame)
}

/// Strip the line terminator (`\n` or `\r\n`) from received text.
pub fn trim_line(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_use_network_byte_order() {
        assert_eq!(encode_value(5), [0, 0, 0, 5]);
        assert_eq!(encode_value(-1), [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(decode_value([0, 0, 1, 0]), 256);
        assert_eq!(decode_value([0x80, 0, 0, 0]), i32::MIN);
    }

    #[test]
    fn test_step() {
        assert_eq!(step(5), Step::Continue(6));
        assert_eq!(step(-1), Step::Continue(0));
        assert_eq!(step(0), Step::Stop);
        assert_eq!(step(i32::MAX), Step::Continue(i32::MIN));
    }

    #[test]
    fn test_text_frame_appends_newline() {
        assert_eq!(text_frame("hola").unwrap(), b"hola\n".to_vec());
        assert_eq!(text_frame("hola\n").unwrap(), b"hola\n".to_vec());
    }

    #[test]
    fn test_text_frame_limit() {
        let fits = "a".repeat(MAX_TEXT_LEN - 1);
        assert_eq!(text_frame(&fits).unwrap().len(), MAX_TEXT_LEN);

        let too_long = "a".repeat(MAX_TEXT_LEN);
        match text_frame(&too_long) {
            Err(ExchangeError::TextTooLong { len, max }) => {
                assert_eq!(len, MAX_TEXT_LEN + 1);
                assert_eq!(max, MAX_TEXT_LEN);
            }
            other => panic!("expected TextTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_trim_line() {
        assert_eq!(trim_line("hola\r\n"), "hola");
        assert_eq!(trim_line("hola\n"), "hola");
        assert_eq!(trim_line("hola"), "hola");
        assert_eq!(trim_line("a\r\n\r\n"), "a\r\n");
        assert_eq!(trim_line("a\n\n"), "a\n");
    }
}
