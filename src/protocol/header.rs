//! Header block scanning and parsing.
//!
//! The wire header is a block of ASCII `Name: Value` lines terminated by a
//! blank line (CR LF CR LF):
//! ```text
//! Content-Length: 30\r\n
//! \r\n
//! {"method":"initialize","id":1}
//! ```
//!
//! Only `Content-Length` is interpreted; unknown headers are permitted and
//! ignored.

use crate::error::{BridgeError, Result};

/// Header terminator: CR LF CR LF.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Case-sensitive header name prefix carrying the payload byte count.
pub const CONTENT_LENGTH_PREFIX: &str = "Content-Length:";

/// Scanner state while looking for the header terminator.
///
/// The next expected terminator byte advances one state. A `\r` that does
/// not advance restarts at `SawCr` since it may begin a new terminator; any
/// other byte restarts at `Init`. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderScanner {
    #[default]
    Init,
    SawCr,
    SawCrLf,
    SawCrLfCr,
    Done,
}

impl HeaderScanner {
    /// Create a scanner in the initial state.
    pub fn new() -> Self {
        Self::Init
    }

    /// Feed one header byte and return the new state.
    pub fn feed(&mut self, byte: u8) -> Self {
        use HeaderScanner::*;
        *self = match (*self, byte) {
            (Done, _) => Done,
            (Init, b'\r') => SawCr,
            (SawCr, b'\n') => SawCrLf,
            (SawCrLf, b'\r') => SawCrLfCr,
            (SawCrLfCr, b'\n') => Done,
            (_, b'\r') => SawCr,
            _ => Init,
        };
        *self
    }

    /// Check whether the full terminator has been seen.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Parse the declared payload length out of a complete header block.
///
/// The block is split on CRLF and blank lines are skipped. If the
/// `Content-Length` header repeats, the last occurrence wins. A missing
/// header is treated as a zero-length message; a value that does not parse
/// as a non-negative base-10 integer is a framing error.
pub fn content_length(header: &[u8]) -> Result<usize> {
    let text = String::from_utf8_lossy(header);
    let mut declared: Option<usize> = None;

    for line in text.split("\r\n").filter(|l| !l.is_empty()) {
        if let Some(rest) = line.strip_prefix(CONTENT_LENGTH_PREFIX) {
            let value = rest.trim();
            let parsed = value.parse::<usize>().map_err(|_| {
                BridgeError::Protocol(format!("invalid Content-Length value: {:?}", value))
            })?;
            declared = Some(parsed);
        }
    }

    match declared {
        Some(n) => Ok(n),
        None => {
            tracing::warn!("header block has no Content-Length, treating as empty message");
            Ok(0)
        }
    }
}
