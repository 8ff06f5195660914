//! Engine process launch.
//!
//! The engine is spawned once at startup and reached only through the
//! channel it exposes. The bridge's PID rides along in the `parentId`
//! environment variable so the engine can detect the bridge going away;
//! beyond that the engine's lifecycle is its own.

use tokio::process::{Child, Command};

use crate::config::Config;
use crate::error::Result;

/// Handle to the spawned engine process.
pub struct EngineProcess {
    child: Child,
}

impl EngineProcess {
    /// Launch the engine with inherited stdio.
    pub fn spawn(config: &Config) -> Result<Self> {
        let child = Command::new(&config.engine_command)
            .args(&config.engine_args)
            .env("parentId", std::process::id().to_string())
            .spawn()?;
        Ok(Self { child })
    }

    /// OS process id, if the engine is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_passes_parent_pid() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("parent-id");

        let config = Config {
            engine_command: "sh".to_string(),
            engine_args: vec![
                "-c".to_string(),
                format!("printf %s \"$parentId\" > {}", out.display()),
            ],
            ..Config::default()
        };

        let mut engine = EngineProcess::spawn(&config).unwrap();
        engine.child.wait().await.unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, std::process::id().to_string());
    }
}
