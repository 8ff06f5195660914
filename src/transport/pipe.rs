//! Platform-specific engine channel implementation.
//!
//! - Unix: Unix Domain Socket
//! - Windows: Named Pipe
//!
//! The engine owns the channel: it creates the endpoint after being
//! spawned, and the bridge connects to it as a client, retrying until the
//! endpoint exists or the deadline passes.
//!
//! # Example
//!
//! ```ignore
//! use langbridge::transport::{pipe_path, PipeStream};
//!
//! let path = pipe_path("language-pipe");
//! let stream = PipeStream::connect(&path, Duration::from_secs(30)).await?;
//! ```

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

/// Delay between connect attempts while the engine is still starting.
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Channel path for a given name.
///
/// Format:
/// - Unix: `/tmp/<name>.sock`
/// - Windows: `\\.\pipe\<name>`
pub fn pipe_path(name: &str) -> String {
    #[cfg(unix)]
    {
        format!("/tmp/{}.sock", name)
    }

    #[cfg(windows)]
    {
        format!(r"\\.\pipe\{}", name)
    }
}

// ============================================================================
// Unix Implementation
// ============================================================================

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use crate::error::{BridgeError, Result};
    use tokio::net::UnixStream;
    use tokio::time::Instant;

    /// Unix Domain Socket stream (connected).
    pub struct PipeStream {
        stream: UnixStream,
    }

    impl PipeStream {
        /// Connect to the engine socket, retrying until `timeout` elapses.
        ///
        /// The socket file appears only once the engine has started up, so
        /// the first attempts are expected to fail.
        pub async fn connect(path: &str, timeout: Duration) -> Result<Self> {
            let deadline = Instant::now() + timeout;
            loop {
                match UnixStream::connect(path).await {
                    Ok(stream) => return Ok(Self { stream }),
                    Err(e) => {
                        if Instant::now() >= deadline {
                            tracing::error!("giving up on engine channel {}: {}", path, e);
                            return Err(BridgeError::ConnectTimeout(timeout));
                        }
                        tracing::trace!("engine channel not ready yet: {}", e);
                        tokio::time::sleep(RETRY_INTERVAL).await;
                    }
                }
            }
        }

        /// Get a reference to the underlying stream.
        pub fn inner(&self) -> &UnixStream {
            &self.stream
        }
    }

    impl AsyncRead for PipeStream {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for PipeStream {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::pin::Pin::new(&mut self.stream).poll_write(cx, buf)
        }

        fn poll_flush(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_flush(cx)
        }

        fn poll_shutdown(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_shutdown(cx)
        }
    }
}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use crate::error::{BridgeError, Result};
    use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};
    use tokio::time::Instant;

    /// Windows Named Pipe stream (connected).
    pub struct PipeStream {
        pipe: NamedPipeClient,
    }

    impl PipeStream {
        /// Connect to the engine pipe, retrying until `timeout` elapses.
        ///
        /// Covers both the pipe not existing yet and all instances being
        /// busy (ERROR_PIPE_BUSY).
        pub async fn connect(path: &str, timeout: Duration) -> Result<Self> {
            let deadline = Instant::now() + timeout;
            loop {
                match ClientOptions::new().open(path) {
                    Ok(pipe) => return Ok(Self { pipe }),
                    Err(e) => {
                        if Instant::now() >= deadline {
                            tracing::error!("giving up on engine channel {}: {}", path, e);
                            return Err(BridgeError::ConnectTimeout(timeout));
                        }
                        tracing::trace!("engine channel not ready yet: {}", e);
                        tokio::time::sleep(RETRY_INTERVAL).await;
                    }
                }
            }
        }

        /// Get a reference to the underlying pipe.
        pub fn inner(&self) -> &NamedPipeClient {
            &self.pipe
        }
    }

    impl AsyncRead for PipeStream {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.pipe).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for PipeStream {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::pin::Pin::new(&mut self.pipe).poll_write(cx, buf)
        }

        fn poll_flush(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.pipe).poll_flush(cx)
        }

        fn poll_shutdown(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.pipe).poll_shutdown(cx)
        }
    }
}

// ============================================================================
// Platform-independent re-exports
// ============================================================================

#[cfg(unix)]
pub use unix_impl::PipeStream;

#[cfg(windows)]
pub use windows_impl::PipeStream;
