use clap::Parser;
use hash_cracker::config::{Cli, ManagerArgs, Role, WorkerArgs};
use hash_cracker::coordinator::coordinator::Coordinator;
use hash_cracker::coordinator::dispatch::HttpDispatcher;
use hash_cracker::coordinator::handlers as manager_handlers;
use hash_cracker::coordinator::ledger::{Ledger, MemoryLedger, SqliteLedger};
use hash_cracker::cracker::handlers as worker_handlers;
use hash_cracker::cracker::pool::CrackerPool;
use hash_cracker::cracker::reporter::HttpReporter;
use hash_cracker::probe;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level()?)
        .init();

    match cli.role {
        Role::Manager(args) => run_manager(args).await,
        Role::Worker(args) => run_worker(args).await,
    }
}

async fn run_manager(args: ManagerArgs) -> anyhow::Result<()> {
    let config = args.coordinator_config()?;

    tracing::info!(
        "Starting manager with {} workers: {:?}",
        config.worker_urls.len(),
        config.worker_urls
    );

    // 1. Ledger:
    let ledger: Arc<dyn Ledger> = if args.is_memory_ledger() {
        tracing::warn!("Using in-memory ledger, requests will not survive a restart");
        Arc::new(MemoryLedger::new())
    } else {
        Arc::new(SqliteLedger::open(&args.ledger_path)?)
    };

    // 2. Coordinator:
    let coordinator = Coordinator::new(config, ledger, Arc::new(HttpDispatcher::new()))?;

    // 3. Replay unfinished requests in the background:
    let recovering = coordinator.clone();
    tokio::spawn(async move {
        match recovering.recover().await {
            Ok(count) => tracing::info!("Recovery finished: {} requests resubmitted", count),
            Err(e) => tracing::error!("Recovery failed: {}", e),
        }
    });

    // 4. HTTP servers:
    let app = manager_handlers::router(coordinator);
    serve_with_probe(app, args.main_server_port, args.probe_server_port).await
}

async fn run_worker(args: WorkerArgs) -> anyhow::Result<()> {
    let manager_url = args.manager_url();
    tracing::info!("Starting worker reporting to {}", manager_url);

    let reporter = Arc::new(HttpReporter::new(&manager_url));
    let pool = CrackerPool::start(reporter, args.threads(), args.queue_capacity);

    let app = worker_handlers::router(pool);
    serve_with_probe(app, args.main_server_port, args.probe_server_port).await
}

async fn serve_with_probe(app: Router, main_port: u16, probe_port: u16) -> anyhow::Result<()> {
    let main_addr = SocketAddr::from(([0, 0, 0, 0], main_port));
    let probe_addr = SocketAddr::from(([0, 0, 0, 0], probe_port));

    let main_listener = tokio::net::TcpListener::bind(main_addr).await?;
    let probe_listener = tokio::net::TcpListener::bind(probe_addr).await?;

    tracing::info!("HTTP server listening on {}", main_addr);
    tracing::info!("Probe server listening on {}", probe_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let main_server = axum::serve(main_listener, app).with_graceful_shutdown(shutdown_signal());
    let probe_server =
        axum::serve(probe_listener, probe::router()).with_graceful_shutdown(shutdown_signal());

    tokio::try_join!(
        async { main_server.await },
        async { probe_server.await }
    )?;

    tracing::info!("Servers stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully");
}
