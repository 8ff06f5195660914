//! Frame encoding and incremental decoding.
//!
//! A frame is a header block plus exactly `Content-Length` payload bytes.
//! [`FrameScanner`] accepts arbitrary stream chunks and yields complete
//! payloads; [`FrameReader`] pulls frames from an `AsyncRead`.
//!
//! Header bytes are scanned one at a time through [`HeaderScanner`]; body
//! bytes are only counted, never scanned, so a body may itself contain the
//! terminator sequence.
//!
//! # Example
//!
//! ```
//! use langbridge::protocol::{encode_frame, FrameScanner};
//!
//! let wire = encode_frame(b"hello");
//! let mut scanner = FrameScanner::new();
//! let frames = scanner.push(&wire).unwrap();
//! assert_eq!(&frames[0][..], b"hello");
//! ```

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::header::{content_length, HeaderScanner};
use crate::error::{BridgeError, Result};

/// Default maximum declared payload size (1 GB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1_073_741_824;

/// Read buffer size for [`FrameReader`].
const READ_BUF_SIZE: usize = 64 * 1024;

/// Encode a payload into header + body wire bytes.
///
/// Emits `Content-Length: <len>\r\n\r\n` followed by the payload verbatim.
/// No other headers are produced.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    let mut buf = Vec::with_capacity(header.len() + payload.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// State machine for frame decoding.
#[derive(Debug)]
enum State {
    /// Scanning header bytes for the terminator.
    Header { scanner: HeaderScanner },
    /// Header consumed; `remaining` body bytes still expected.
    Body { remaining: usize },
}

/// Incremental decoder accumulating stream chunks into complete payloads.
pub struct FrameScanner {
    state: State,
    /// Header bytes of the frame currently being scanned.
    header: BytesMut,
    /// Body bytes accumulated so far.
    body: BytesMut,
    max_payload_size: usize,
}

impl FrameScanner {
    /// Create a scanner with the default max payload size.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Create a scanner with a custom max payload size.
    pub fn with_max_payload(max_payload_size: usize) -> Self {
        Self {
            state: State::Header {
                scanner: HeaderScanner::new(),
            },
            header: BytesMut::new(),
            body: BytesMut::new(),
            max_payload_size,
        }
    }

    /// Push stream data and extract all complete payloads, in order.
    ///
    /// Data may arrive in any fragmentation, down to one byte at a time;
    /// partial frames are carried over to the next push.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed `Content-Length` value or a declared
    /// length above the configured maximum. The scanner is not usable after
    /// an error: framing has been lost.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        let mut frames = Vec::new();
        let mut input = data;

        while !input.is_empty() {
            match &mut self.state {
                State::Header { scanner } => {
                    let mut consumed = 0;
                    let mut done = false;
                    for &b in input {
                        consumed += 1;
                        if scanner.feed(b).is_done() {
                            done = true;
                            break;
                        }
                    }
                    self.header.extend_from_slice(&input[..consumed]);
                    input = &input[consumed..];

                    if done {
                        let declared = content_length(&self.header)?;
                        if declared > self.max_payload_size {
                            return Err(BridgeError::Protocol(format!(
                                "declared payload size {} exceeds maximum {}",
                                declared, self.max_payload_size
                            )));
                        }
                        self.header.clear();
                        if declared == 0 {
                            frames.push(Bytes::new());
                            self.state = State::Header {
                                scanner: HeaderScanner::new(),
                            };
                        } else {
                            self.state = State::Body {
                                remaining: declared,
                            };
                        }
                    }
                }
                State::Body { remaining } => {
                    let take = (*remaining).min(input.len());
                    self.body.extend_from_slice(&input[..take]);
                    *remaining -= take;
                    input = &input[take..];

                    if *remaining == 0 {
                        frames.push(self.body.split().freeze());
                        self.state = State::Header {
                            scanner: HeaderScanner::new(),
                        };
                    }
                }
            }
        }

        Ok(frames)
    }

    /// Consume the scanner state at end-of-stream.
    ///
    /// A frame cut short mid-body yields the bytes actually read (a short
    /// message the caller must treat as incomplete); a stream ending
    /// mid-header yields nothing.
    pub fn take_partial(&mut self) -> Option<Bytes> {
        match self.state {
            State::Body { .. } => {
                self.state = State::Header {
                    scanner: HeaderScanner::new(),
                };
                Some(self.body.split().freeze())
            }
            State::Header { .. } => None,
        }
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull adapter reading complete frames from an async byte stream.
pub struct FrameReader<R> {
    reader: R,
    scanner: FrameScanner,
    pending: VecDeque<Bytes>,
    buf: Box<[u8]>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a reader with a fresh scanner.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            scanner: FrameScanner::new(),
            pending: VecDeque::new(),
            buf: vec![0u8; READ_BUF_SIZE].into_boxed_slice(),
            eof: false,
        }
    }

    /// Next complete payload, or the partial body of a frame cut short by
    /// end-of-stream, or `None` once the stream is exhausted.
    pub async fn next_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }
            if self.eof {
                return Ok(None);
            }
            let n = self.reader.read(&mut self.buf).await?;
            if n == 0 {
                self.eof = true;
                return Ok(self.scanner.take_partial());
            }
            self.pending.extend(self.scanner.push(&self.buf[..n])?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        let wire = encode_frame(br#"{"method":"initialize","id":1}"#);
        assert_eq!(
            wire,
            b"Content-Length: 30\r\n\r\n{\"method\":\"initialize\",\"id\":1}"
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        assert_eq!(encode_frame(b""), b"Content-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_roundtrip() {
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(&encode_frame(b"hello")).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], b"hello");
    }

    #[test]
    fn test_roundtrip_empty_payload() {
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(&encode_frame(b"")).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_empty());
    }

    #[test]
    fn test_body_containing_terminator_not_rescanned() {
        // The body itself contains \r\n\r\n; everything after the first
        // header terminator is body, byte for byte.
        let body = b"first\r\n\r\nsecond";
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(&encode_frame(body)).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], body);
    }

    #[test]
    fn test_body_with_embedded_crlf() {
        let body = b"line1\r\nline2\nline3\r";
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(&encode_frame(body)).unwrap();
        assert_eq!(&frames[0][..], &body[..]);
    }

    #[test]
    fn test_byte_at_a_time() {
        let wire = encode_frame(b"hi");
        let mut scanner = FrameScanner::new();
        let mut all = Vec::new();
        for &b in &wire {
            all.extend(scanner.push(&[b]).unwrap());
        }
        assert_eq!(all.len(), 1);
        assert_eq!(&all[0][..], b"hi");
    }

    #[test]
    fn test_multiple_frames_in_one_push() {
        let mut wire = encode_frame(b"first");
        wire.extend(encode_frame(b"second"));
        wire.extend(encode_frame(b""));

        let mut scanner = FrameScanner::new();
        let frames = scanner.push(&wire).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(&frames[0][..], b"first");
        assert_eq!(&frames[1][..], b"second");
        assert!(frames[2].is_empty());
    }

    #[test]
    fn test_frame_split_across_pushes() {
        let wire = encode_frame(b"fragmented payload");
        let mut scanner = FrameScanner::new();

        let frames = scanner.push(&wire[..10]).unwrap();
        assert!(frames.is_empty());
        let frames = scanner.push(&wire[10..25]).unwrap();
        assert!(frames.is_empty());
        let frames = scanner.push(&wire[25..]).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], b"fragmented payload");
    }

    #[test]
    fn test_take_partial_mid_body() {
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(b"Content-Length: 10\r\n\r\nfour").unwrap();
        assert!(frames.is_empty());
        let partial = scanner.take_partial().unwrap();
        assert_eq!(&partial[..], b"four");
    }

    #[test]
    fn test_take_partial_mid_header() {
        let mut scanner = FrameScanner::new();
        scanner.push(b"Content-Len").unwrap();
        assert!(scanner.take_partial().is_none());
    }

    #[test]
    fn test_max_payload_rejected() {
        let mut scanner = FrameScanner::with_max_payload(100);
        let result = scanner.push(b"Content-Length: 1000\r\n\r\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("exceeds maximum"));
    }

    #[test]
    fn test_malformed_length_rejected() {
        let mut scanner = FrameScanner::new();
        let result = scanner.push(b"Content-Length: nope\r\n\r\n");
        assert!(matches!(result, Err(BridgeError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_frame_reader_yields_frames_then_none() {
        let (mut tx, rx) = tokio::io::duplex(4096);
        let mut reader = FrameReader::new(rx);

        tokio::io::AsyncWriteExt::write_all(&mut tx, &encode_frame(b"one"))
            .await
            .unwrap();
        tokio::io::AsyncWriteExt::write_all(&mut tx, &encode_frame(b"two"))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(&reader.next_frame().await.unwrap().unwrap()[..], b"one");
        assert_eq!(&reader.next_frame().await.unwrap().unwrap()[..], b"two");
        assert!(reader.next_frame().await.unwrap().is_none());
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_frame_reader_short_stream_returns_partial() {
        let (mut tx, rx) = tokio::io::duplex(4096);
        let mut reader = FrameReader::new(rx);

        tokio::io::AsyncWriteExt::write_all(&mut tx, b"Content-Length: 10\r\n\r\nhalf")
            .await
            .unwrap();
        drop(tx);

        let partial = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(&partial[..], b"half");
        assert!(reader.next_frame().await.unwrap().is_none());
    }
}
