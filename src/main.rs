use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use worker_service::api;
use worker_service::cli::{Cli, Command};
use worker_service::client::WorkerClient;
use worker_service::config::WorkerConfig;
use worker_service::service::JobService;
use worker_service::shutdown::{install_shutdown_handler, wait_for_signal};
use worker_service::ui::{self, JobProgress};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Serve { port } => {
            let mut config = WorkerConfig::load_from(&cli.config)?;
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Submit {
            job_type,
            wait,
            poll_ms,
        } => {
            let client = WorkerClient::new(&cli.addr)?;
            let created = client.submit(&job_type).await?;
            if !wait {
                ui::print_json(&created);
                return Ok(());
            }

            let progress = JobProgress::start(&created.job_id, &created.job_type);
            let record = client
                .wait_for_terminal(&created.job_id, Duration::from_millis(poll_ms), |r| {
                    progress.update(r)
                })
                .await?;
            progress.finish(&record);
            Ok(())
        }
        Command::Status { job_id } => {
            let client = WorkerClient::new(&cli.addr)?;
            ui::print_json(&client.get_status(&job_id).await?);
            Ok(())
        }
        Command::List => {
            let client = WorkerClient::new(&cli.addr)?;
            let listing = client.list().await?;
            println!("{} jobs ({} queued for execution)", listing.total, listing.queue_size);
            for record in &listing.jobs {
                println!("{}", ui::status_line(record));
            }
            Ok(())
        }
        Command::Stats => {
            let client = WorkerClient::new(&cli.addr)?;
            ui::print_json(&client.stats().await?);
            Ok(())
        }
        Command::Health => {
            let client = WorkerClient::new(&cli.addr)?;
            ui::print_json(&client.health().await?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: WorkerConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let (service, worker) = JobService::start(&config);
    tracing::info!(
        service = %config.service_name,
        time_unit_ms = config.time_unit_ms,
        "Worker service starting"
    );

    let shutdown = install_shutdown_handler();
    let served = api::serve(addr, service, shutdown.clone()).await;

    // The server may have failed to bind; stop the worker either way.
    shutdown.cancel();
    if config.drain_on_shutdown {
        tracing::info!("Draining queued jobs, send another signal to stop immediately");
    }
    // A second signal abandons whatever the worker still has to do.
    worker
        .shutdown_unless(config.drain_on_shutdown, wait_for_signal())
        .await;
    served.context("worker service stopped with an error")
}
