use anyhow::{Context, Result};
use clap::Parser;
use dorimeji::Config;

fn main() -> Result<()> {
    init_tracing();
    let config = Config::parse();
    dorimeji::run(&config).with_context(|| format!("dorimeji ({})", config.sprite.display()))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
