use clap::Parser;
use deenlab::RecordStore;
use eyre::Result;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "deenlab")]
#[command(about = "Deen LAB Manager - suivi des réparations d'un atelier de téléphonie")]
#[command(version)]
struct Cli {
    /// Address the web interface listens on
    #[arg(short, long, default_value = "127.0.0.1:8501")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Backing file and evidence directory live in the working directory;
    // their names are deploy-time constants, not flags.
    let store = Arc::new(RecordStore::new("."));

    deenlab::server::serve(store, &cli.listen).await
}
