//! Bridge binary: spawn the engine, connect both endpoints, relay.

use langbridge::bridge::Session;
use langbridge::config;
use langbridge::engine::EngineProcess;
use langbridge::error::Result;
use langbridge::transport::{pipe_path, PipeStream, ReplyListener};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = config::load();

    let engine = EngineProcess::spawn(&config)?;
    tracing::info!(pid = ?engine.id(), "engine started");

    let path = pipe_path(&config.pipe_name);
    tracing::info!("connecting to engine channel at {}", path);
    let pipe = PipeStream::connect(&path, config.connect_timeout).await?;
    tracing::info!("engine channel connected");

    let listener = ReplyListener::bind(&config.bind_addr).await?;
    tracing::info!("listening for the client on {}", config.bind_addr);
    let client = listener.accept().await?;

    let mut session = Session::new(client, pipe, config.reply_deadline);
    session.run().await
}
