use clap::Parser as _;
use dotenvy::dotenv;
use index_inventory::cli::{Cli, CollectCmd, Commands, PrintCmd, RecreateCmd};
use index_inventory::config::{invocation_params, CollectConfig, CollectParams, RecreateConfig};
use index_inventory::core::client::{ClusterClient, LocalStorage, MongoClusterClient};
use index_inventory::report::ReportOptions;
use index_inventory::snapshot::save_json;
use index_inventory::types::Provenance;
use index_inventory::utils::logging::init_logging;
use index_inventory::{collect, load, print, recreate, save, InventoryResult};
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Collect { collect_command } => {
            debug!("Executing collect command with args: {:?}", collect_command);
            run_collect(*collect_command).await
        }
        Commands::Print { print_command } => {
            debug!("Executing print command with args: {:?}", print_command);
            run_print(print_command).await
        }
        Commands::Recreate { recreate_command } => {
            debug!("Executing recreate command with args: {:?}", recreate_command);
            run_recreate(*recreate_command).await
        }
    };

    if let Err(e) = result {
        error!(
            error = %e,
            error_chain = ?e,
            "index-inventory failed"
        );
        std::process::exit(1);
    }
}

async fn run_collect(collect_cmd: CollectCmd) -> InventoryResult<()> {
    let config = CollectConfig::try_from(collect_cmd)?;
    let client = MongoClusterClient::new(&config.connection).await?;
    info!(host = %client.host(), "Collecting index inventory");

    let provenance = Provenance::new(client.host(), invocation_params(std::env::args_os()));
    let snapshot = collect(&client, config.collect.clone(), provenance).await?;
    print(&snapshot, config.report)?;

    let storage = LocalStorage::new(&config.output_dir);
    save(&storage, &snapshot).await?;
    if config.write_json {
        save_json(&storage, &snapshot).await?;
    }
    Ok(())
}

async fn run_print(print_cmd: PrintCmd) -> InventoryResult<()> {
    let storage = LocalStorage::new("");
    let snapshot = load(&storage, &print_cmd.file.to_string_lossy()).await?;
    if let Some(provenance) = &snapshot.provenance {
        info!(
            host = %provenance.host,
            version = %provenance.version,
            captured_at = %provenance.captured_at,
            "Printing index snapshot"
        );
    }
    print(&snapshot, ReportOptions { use_color: !print_cmd.report_args.no_color })?;
    Ok(())
}

/// Replay a snapshot, then inventory the target cluster so both can be compared.
async fn run_recreate(recreate_cmd: RecreateCmd) -> InventoryResult<()> {
    let config = RecreateConfig::try_from(recreate_cmd)?;
    let storage = LocalStorage::new("");
    let source = load(&storage, &config.file.to_string_lossy()).await?;

    let client = MongoClusterClient::new(&config.connection).await?;
    info!(host = %client.host(), indexes = source.index_count(), "Recreating indexes");
    let summary = recreate(&client, &source, config.concurrency).await;
    if summary.failed > 0 {
        warn!(failed = summary.failed, "Some indexes could not be created, see the errors above");
    }

    let params = CollectParams { database: None, concurrency: config.concurrency };
    let provenance = Provenance::new(client.host(), invocation_params(std::env::args_os()));
    let target = collect(&client, params, provenance).await?;
    print(&target, config.report)?;
    Ok(())
}
