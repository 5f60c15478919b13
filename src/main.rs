//! Relayscout - CLI entry point

use clap::Parser;
use relayscout::{Config, Pipeline, VERSION};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "relayscout")]
#[command(author = "Tsang")]
#[command(version = VERSION)]
#[command(about = "Fetch the public Tor relay directory and emit reachable relay addresses")]
struct Args {
    /// Comma-separated proxy chain to fetch through, e.g.
    /// http://proxy-one.org:8888,http://proxy-two.org:8881
    #[arg(short = 'p', long = "proxy")]
    proxy: Option<String>,

    /// Directory fetch timeout in seconds
    #[arg(short = 't', long = "timeout", default_value_t = 5)]
    timeout: u64,

    /// Number of validated relay addresses to collect
    #[arg(short = 'c', long = "count", default_value_t = 30)]
    count: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relayscout=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = Config {
        fetch_timeout: Duration::from_secs(args.timeout),
        count: args.count,
        ..Config::default()
    };
    if let Some(list) = args.proxy.as_deref() {
        config = match config.with_proxy_list(list) {
            Ok(c) => c,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    info!("Relayscout v{}", VERSION);
    info!("Trying to load relays...");

    let pipeline = Pipeline::new(config);
    match pipeline.run().await {
        Ok(output) => {
            info!("Load successful");
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
