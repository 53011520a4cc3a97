use clap::Parser;
use pagewatch::drivers::remote;
use pagewatch::utils::{logger, validation::Validate};
use pagewatch::worker::shutdown_channel;
use pagewatch::{init_drivers, CliConfig, DriverKind, LocalSnapshots, Supervisor, WatchEngine};
use std::time::Duration;

const WORKER_READY_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting pagewatch");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let once = cli.once;
    let config = match cli.into_watch_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed to load: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let repo = match init_drivers(&config) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!("❌ Driver setup failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let driver = match repo.select(config.driver) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // With the remote driver and a configured command, the worker is ours to
    // run: supervise it in the background and take it down on exit.
    let supervisor = match (config.driver, config.worker.command.clone()) {
        (DriverKind::Remote, Some(command)) => {
            tracing::info!("launching fetch worker: {}", command);
            let handle = Supervisor::new(
                command,
                vec!["--listen".to_string(), config.worker.addr.clone()],
            )
            .start();

            if !remote::wait_until_ready(&config.worker.addr, WORKER_READY_TIMEOUT).await {
                tracing::warn!(
                    "worker at {} not reachable yet, fetches may fail until it is",
                    config.worker.addr
                );
            }
            Some(handle)
        }
        _ => None,
    };

    let store = LocalSnapshots::new(config.data_dir.clone());
    let engine = WatchEngine::new(store, config, driver);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let result = engine.run(once, shutdown_rx).await;

    // the worker never outlives the foreground run
    if let Some(handle) = supervisor {
        handle.shutdown().await;
    }

    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ Watch run finished: {} fetched, {} failed",
                summary.fetched,
                summary.failed
            );
            println!(
                "✅ Watch run finished: {} fetched, {} failed",
                summary.fetched, summary.failed
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Watch run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                pagewatch::utils::error::ErrorSeverity::Low => 0,
                pagewatch::utils::error::ErrorSeverity::Medium => 2,
                pagewatch::utils::error::ErrorSeverity::High => 1,
                pagewatch::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
