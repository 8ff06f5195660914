//! Transport module - the two endpoint adapters.
//!
//! Provides abstraction over:
//! - Engine side: Unix Domain Sockets (Linux/macOS) or Named Pipes (Windows)
//! - Client side: TCP request/reply, one message per line

mod pipe;
mod reply;

pub use pipe::{pipe_path, PipeStream};
pub use reply::{ReplyChannel, ReplyListener};
