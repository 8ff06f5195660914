//! Bridge module - message classification and the relay loop.
//!
//! The bridge sits between the client's request/reply channel and the
//! engine's framed byte stream:
//!
//! ```text
//! client ──recv──► classify ──frame──► engine
//! client ◄─reply── relay    ◄─frame──  engine   (requests only)
//! ```

mod classify;
mod relay;

pub use classify::MessageKind;
pub use relay::{Session, NOTIFICATION_ACK, REPLY_TIMEOUT};
