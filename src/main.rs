use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use scoring_api::logging::init_logging;
use scoring_api::scoring::{NoStore, StoreScoring};
use scoring_api::{MethodRouter, ScoringServer, ServerConfig};

/// Scoring API server.
#[derive(Parser, Debug)]
#[clap(name = "scoring_api", author, version, about)]
struct Args {
    /// Port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    port: u16,

    /// Address to bind.
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    /// File to append logs to instead of stdout.
    #[clap(short, long)]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let router = MethodRouter::new(Arc::new(StoreScoring::new(NoStore)));
    let config = ServerConfig::new(&args.host, &args.port.to_string(), router);

    ScoringServer::start(config).await
}
