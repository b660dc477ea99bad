//! GLB Transfer - command-line client for a GLB file server
//!
//! Uploads, downloads and lists GLB models; each command runs as a single
//! cancellable transfer (Ctrl-C cancels it).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::Context;
use console::style;
use glb_transfer::cli::{Cli, Commands};
use glb_transfer::{Config, Operation, RawResponse, TransferClient, TransferError, TransferTask};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

/// Main application entry point
fn run() -> i32 {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{} Failed to start async runtime: {err}", style("✗").red());
            return 1;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", style("✗").red());
            let transfer_err = err.downcast_ref::<TransferError>();
            if let Some(body) = transfer_err.and_then(TransferError::server_body) {
                eprintln!("{} Server response: {body}", style("→").cyan());
            }
            transfer_err.map_or(1, TransferError::exit_code)
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

/// Execute the requested command
async fn execute(cli: Cli) -> anyhow::Result<()> {
    let (config_path, mut config) = match cli.config {
        Some(path) if path.exists() => {
            let config = Config::load_from(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            (path, config)
        }
        Some(path) => (path, Config::default()),
        None => (Config::config_path()?, Config::load()?),
    };
    config.apply_overrides(cli.server_url, cli.timeout);
    config.validate()?;

    if matches!(cli.command, Commands::Init) {
        config.save_to(&config_path)?;
        println!(
            "{} Configuration written to {}",
            style("✓").green(),
            config_path.display()
        );
        return Ok(());
    }

    let client = TransferClient::new(config.client_config())?;
    debug!(server = client.base_url(), timeout_secs = config.timeout_secs, "client ready");

    match cli.command {
        Commands::Upload { path, description } => {
            let receipt = run_task(client.spawn_upload(path, description)).await?;
            println!(
                "{} Uploaded {} ({} bytes)",
                style("✓").green(),
                receipt.name,
                receipt.bytes_sent
            );
            print_body(&receipt.response);
        }
        Commands::Download { id, output } => {
            let asset = run_task(client.spawn_download(id, output)).await?;
            print_download(&asset);
        }
        Commands::DownloadByName { name, output } => {
            let asset = run_task(client.spawn_download_by_name(name, output)).await?;
            print_download(&asset);
        }
        Commands::List => {
            let response = run_task(client.spawn_list()).await?;
            println!("{} Stored GLB files:", style("✓").green());
            print_body(&response);
        }
        Commands::Health { detailed: false } => {
            let response = run_task(client.spawn_health()).await?;
            println!("{} Server is healthy", style("✓").green());
            print_body(&response);
        }
        Commands::Health { detailed: true } => {
            let response = run_task(TransferTask::spawn(
                Operation::Health,
                CancellationToken::new(),
                move |cancel| async move { client.check_health_detailed(&cancel).await },
            ))
            .await?;
            println!("{} Server health report:", style("✓").green());
            print_body(&response);
        }
        Commands::Info { id } => {
            let response = run_task(TransferTask::spawn(
                Operation::Info,
                CancellationToken::new(),
                move |cancel| async move { client.file_info(id, &cancel).await },
            ))
            .await?;
            print_body(&response);
        }
        Commands::Delete { id } => {
            let response = run_task(TransferTask::spawn(
                Operation::Delete,
                CancellationToken::new(),
                move |cancel| async move { client.delete(id, &cancel).await },
            ))
            .await?;
            println!("{} Deleted file {id}", style("✓").green());
            print_body(&response);
        }
        Commands::Init => {}
    }

    Ok(())
}

/// Wait for `task`, cancelling it on Ctrl-C
async fn run_task<T: Send + 'static>(task: TransferTask<T>) -> glb_transfer::Result<T> {
    let cancel = task.cancel_token();
    let operation = task.operation();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(operation = %operation, "interrupt received, cancelling");
            cancel.cancel();
        }
    });

    let result = task.join().await;
    watcher.abort();
    result
}

fn print_download(asset: &glb_transfer::DownloadedAsset) {
    println!(
        "{} Downloaded {} to {}",
        style("✓").green(),
        asset.name,
        asset.save_path.display()
    );
    if !asset.description.is_empty() {
        println!("{} Description: {}", style("→").cyan(), asset.description);
    }
    println!("{} File size: {} bytes", style("→").cyan(), asset.file_size);
}

fn print_body(response: &RawResponse) {
    match response
        .json()
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
    {
        Some(pretty) => println!("{pretty}"),
        None if response.body.is_empty() => {}
        None => println!("{}", response.body),
    }
}
