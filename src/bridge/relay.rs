//! The relay loop.
//!
//! Cycles between two states: awaiting a client message and awaiting the
//! engine's reply. Exactly one reply goes back upstream for every message
//! received, and at most one frame is in flight on the engine stream.
//!
//! # Example
//!
//! ```ignore
//! use langbridge::bridge::Session;
//!
//! let client = listener.accept().await?;
//! let engine = PipeStream::connect(&path, connect_timeout).await?;
//! Session::new(client, engine, Some(Duration::from_secs(60)))
//!     .run()
//!     .await?;
//! ```

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::time::timeout;

use crate::error::Result;
use crate::protocol::{encode_frame, FrameReader};
use crate::transport::ReplyChannel;

use super::MessageKind;

/// Fixed acknowledgment sent upstream for notification messages.
pub const NOTIFICATION_ACK: &str = "code GREEN!";

/// Fixed reply sent upstream when the engine misses the reply deadline.
pub const REPLY_TIMEOUT: &str = r#"{"error":"engine reply timed out"}"#;

/// One bridge session: the client channel and the engine stream, both held
/// for the process lifetime.
pub struct Session<C, E> {
    client: ReplyChannel<C>,
    engine_rx: FrameReader<ReadHalf<E>>,
    engine_tx: WriteHalf<E>,
    /// Deadline for the engine's reply; `None` waits forever.
    reply_deadline: Option<Duration>,
    /// Frames owed by timed-out exchanges, to be discarded when they land.
    stale_replies: usize,
}

impl<C, E> Session<C, E>
where
    C: AsyncRead + AsyncWrite + Unpin,
    E: AsyncRead + AsyncWrite + Unpin,
{
    /// Build a session from the two connected endpoints.
    pub fn new(client: ReplyChannel<C>, engine: E, reply_deadline: Option<Duration>) -> Self {
        let (engine_rx, engine_tx) = tokio::io::split(engine);
        Self {
            client,
            engine_rx: FrameReader::new(engine_rx),
            engine_tx,
            reply_deadline,
            stale_replies: 0,
        }
    }

    /// Run the relay until the client disconnects or framing is lost.
    pub async fn run(&mut self) -> Result<()> {
        while let Some(message) = self.client.recv().await? {
            tracing::debug!("client -> {}", message);

            match MessageKind::classify(&message) {
                MessageKind::Notification => {
                    // Ack first: the client is blocked until it has a reply
                    // in hand, and no engine reply will ever come.
                    self.client.send(NOTIFICATION_ACK).await?;
                    self.forward(&message).await?;
                }
                MessageKind::Request => {
                    self.forward(&message).await?;
                    let reply = self.await_reply().await?;
                    tracing::debug!("engine -> {}", reply);
                    self.client.send(&reply).await?;
                }
            }
        }

        tracing::info!("client disconnected, session over");
        Ok(())
    }

    /// Encode and write one message to the engine.
    async fn forward(&mut self, message: &str) -> Result<()> {
        self.engine_tx
            .write_all(&encode_frame(message.as_bytes()))
            .await?;
        self.engine_tx.flush().await?;
        Ok(())
    }

    /// Wait for the engine's reply, bounded by the reply deadline.
    ///
    /// A deadline miss yields the fixed timeout reply; the frame the engine
    /// still owes is discarded whenever it lands, keeping later requests
    /// paired with their own replies.
    async fn await_reply(&mut self) -> Result<String> {
        let frame = match self.reply_deadline {
            Some(deadline) => {
                let result = timeout(deadline, self.next_live_frame()).await;
                match result {
                    Ok(frame) => frame?,
                    Err(_) => {
                        tracing::warn!("engine reply deadline expired");
                        self.stale_replies += 1;
                        return Ok(REPLY_TIMEOUT.to_string());
                    }
                }
            }
            None => self.next_live_frame().await?,
        };

        Ok(match frame {
            Some(payload) => String::from_utf8_lossy(&payload).into_owned(),
            None => {
                tracing::warn!("engine stream closed, forwarding empty reply");
                String::new()
            }
        })
    }

    /// Next frame that belongs to the current exchange.
    async fn next_live_frame(&mut self) -> Result<Option<Bytes>> {
        while self.stale_replies > 0 {
            match self.engine_rx.next_frame().await? {
                Some(_) => {
                    tracing::debug!("discarding stale engine reply");
                    self.stale_replies -= 1;
                }
                None => return Ok(None),
            }
        }
        self.engine_rx.next_frame().await
    }
}
