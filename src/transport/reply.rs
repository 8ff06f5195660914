//! Client-facing request/reply endpoint.
//!
//! The client speaks a strict request/reply protocol over TCP: one message
//! per line (UTF-8 text, typically JSON), and every message received must
//! be answered with exactly one reply line before the next message is
//! accepted. The bridge is the reply side of that contract.
//!
//! # Important
//!
//! - One message per line, explicit `\n`, flushed per message
//! - Message bodies must not contain raw newline bytes (compact JSON
//!   never does; escaped `\n` inside strings is fine)

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{BridgeError, Result};

/// TCP listener for the client endpoint.
///
/// Exactly one session is accepted per process lifetime.
pub struct ReplyListener {
    listener: TcpListener,
}

impl ReplyListener {
    /// Bind the client endpoint address.
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    /// The bound address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept a single client connection.
    pub async fn accept(&self) -> Result<ReplyChannel<TcpStream>> {
        let (stream, addr) = self.listener.accept().await?;
        tracing::info!("client connected from {}", addr);
        Ok(ReplyChannel::new(stream))
    }
}

/// One client session enforcing the receive-then-reply alternation.
///
/// Generic over the stream so tests can drive it with in-memory duplex
/// pairs, the way the production path drives it with a `TcpStream`.
pub struct ReplyChannel<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    /// True between a `recv` and its matching `send`.
    awaiting_reply: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> ReplyChannel<S> {
    /// Wrap a connected duplex stream.
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(reader),
            writer,
            awaiting_reply: false,
        }
    }

    /// Receive the next message, or `None` when the client disconnects.
    ///
    /// # Errors
    ///
    /// Calling this while the previous message is still unanswered is a
    /// protocol error: the alternation is a precondition, not something
    /// the wire can recover from.
    pub async fn recv(&mut self) -> Result<Option<String>> {
        if self.awaiting_reply {
            return Err(BridgeError::Protocol(
                "receive before replying to the previous message".to_string(),
            ));
        }

        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }

        self.awaiting_reply = true;
        Ok(Some(line))
    }

    /// Send the single reply for the message last received.
    pub async fn send(&mut self, reply: &str) -> Result<()> {
        if !self.awaiting_reply {
            return Err(BridgeError::Protocol(
                "reply with no message outstanding".to_string(),
            ));
        }

        self.writer.write_all(reply.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        self.awaiting_reply = false;
        Ok(())
    }
}
