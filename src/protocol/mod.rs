//! Protocol module - wire framing for the engine byte stream.
//!
//! This module implements the text protocol on the engine side:
//! - Header terminator scanning (CRLFCRLF automaton)
//! - `Content-Length` parsing
//! - Frame encoding and incremental decoding

mod frame;
mod header;

pub use frame::{encode_frame, FrameReader, FrameScanner, DEFAULT_MAX_PAYLOAD_SIZE};
pub use header::{content_length, HeaderScanner, CONTENT_LENGTH_PREFIX, HEADER_TERMINATOR};
