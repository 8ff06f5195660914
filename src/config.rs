//! Bridge configuration: defaults overridden by environment variables.

use std::time::Duration;

/// Runtime configuration.
///
/// Env overrides: `LANGBRIDGE_BIND`, `LANGBRIDGE_PIPE`, `LANGBRIDGE_ENGINE`,
/// `LANGBRIDGE_ENGINE_ARGS` (whitespace-separated),
/// `LANGBRIDGE_CONNECT_TIMEOUT_SECS`, `LANGBRIDGE_REPLY_TIMEOUT_SECS`
/// (0 disables the deadline).
#[derive(Debug, Clone)]
pub struct Config {
    /// Client request/reply bind address (default 127.0.0.1:5557).
    pub bind_addr: String,
    /// Engine channel name (default "language-pipe").
    pub pipe_name: String,
    /// Engine executable (default "language-server-engine").
    pub engine_command: String,
    /// Extra engine arguments.
    pub engine_args: Vec<String>,
    /// How long to keep retrying the engine channel connect (default 30s).
    pub connect_timeout: Duration,
    /// Engine reply deadline (default 60s); `None` waits forever.
    pub reply_deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5557".to_string(),
            pipe_name: "language-pipe".to_string(),
            engine_command: "language-server-engine".to_string(),
            engine_args: Vec::new(),
            connect_timeout: Duration::from_secs(30),
            reply_deadline: Some(Duration::from_secs(60)),
        }
    }
}

/// Merge defaults with environment overrides.
pub fn load() -> Config {
    let mut c = Config::default();
    if let Ok(s) = std::env::var("LANGBRIDGE_BIND") {
        c.bind_addr = s;
    }
    if let Ok(s) = std::env::var("LANGBRIDGE_PIPE") {
        c.pipe_name = s;
    }
    if let Ok(s) = std::env::var("LANGBRIDGE_ENGINE") {
        c.engine_command = s;
    }
    if let Ok(s) = std::env::var("LANGBRIDGE_ENGINE_ARGS") {
        c.engine_args = s.split_whitespace().map(str::to_string).collect();
    }
    if let Ok(s) = std::env::var("LANGBRIDGE_CONNECT_TIMEOUT_SECS") {
        if let Ok(n) = s.parse::<u64>() {
            c.connect_timeout = Duration::from_secs(n);
        }
    }
    if let Ok(s) = std::env::var("LANGBRIDGE_REPLY_TIMEOUT_SECS") {
        if let Ok(n) = s.parse::<u64>() {
            c.reply_deadline = if n == 0 {
                None
            } else {
                Some(Duration::from_secs(n))
            };
        }
    }
    c
}
