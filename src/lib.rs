//! # langbridge
//!
//! Bridge between a request/reply client socket and a language engine
//! reached over a length-prefixed byte stream.
//!
//! The client side is strict request/reply: one message in, exactly one
//! reply out, in lockstep. The engine side is an ordered byte stream with
//! no message boundaries of its own; frames are delimited by a
//! `Content-Length` header block. The bridge translates between the two,
//! classifying each client message as a request (await the engine's reply)
//! or a notification (ack locally, forward, move on).
//!
//! ## Architecture
//!
//! - **Client plane** (TCP): one message per line, receive-then-reply
//! - **Engine plane** (pipe): `Content-Length` framed UTF-8 payloads
//!
//! ## Example
//!
//! ```ignore
//! use langbridge::bridge::Session;
//! use langbridge::transport::{pipe_path, PipeStream, ReplyListener};
//!
//! let engine = PipeStream::connect(&pipe_path("language-pipe"), connect_timeout).await?;
//! let listener = ReplyListener::bind("127.0.0.1:5557").await?;
//! let client = listener.accept().await?;
//!
//! Session::new(client, engine, reply_deadline).run().await?;
//! ```

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod transport;

pub use bridge::{MessageKind, Session, NOTIFICATION_ACK};
pub use config::Config;
pub use error::BridgeError;
