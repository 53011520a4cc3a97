use anyhow::Result;
use clap::Parser;
use pagewatch::utils::logger;
use pagewatch::worker::{shutdown_channel, WorkerServer};

#[derive(Parser)]
#[command(name = "fetch-worker")]
#[command(about = "Background fetch worker for pagewatch")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3080")]
    listen: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_worker_logger(args.verbose);

    let server = WorkerServer::bind(&args.listen).await?;

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    server.serve(shutdown_rx).await?;
    Ok(())
}
