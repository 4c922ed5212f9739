use clap::{Arg, ArgAction, Command};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{
    cache::MokaTaskCache, config::FileConfigStore, memory::InMemoryTaskRepository,
    stdio::StdioServer,
};
use application::{TaskOperations, TaskService};
use ports::{AppConfig, ConfigStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    // Parse command line arguments
    let matches = Command::new("taskdesk")
        .version("0.1.0")
        .about("In-memory task service speaking line-delimited JSON")
        .long_about("In-memory task service speaking line-delimited JSON.\n\nEach line on stdin is one request, e.g. {\"operation\": \"createTask\", \"input\": {...}}.\nEach reply is written to stdout as {\"status\": ..., \"body\": ...}.\nTasks live only as long as the process.")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file (defaults to the platform config directory)")
                .global(true)
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write logs to this file instead of the configured one")
                .global(true)
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Page size used when a tasks request omits pageSize")
                .global(true)
        )
        .subcommand(
            Command::new("serve")
                .about("Answer requests from stdin (default)")
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as JSON")
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .help("Write the effective configuration back to the config file")
                )
        )
        .get_matches();

    // Load configuration
    let config_store = match matches.get_one::<PathBuf>("config") {
        Some(path) => FileConfigStore::at(path),
        None => FileConfigStore::new()?,
    };
    let mut config = config_store.load_config().await?;

    // Command line arguments override the file
    if let Some(log_file) = matches.get_one::<PathBuf>("log-file") {
        config.log_file = log_file.clone();
    }
    if let Some(page_size) = matches.get_one::<usize>("page-size") {
        config.default_page_size = *page_size;
    }

    // Initialize logging to file; stdout carries replies
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();

    match matches.subcommand() {
        Some(("config", config_matches)) => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");

            if config_matches.get_flag("save") {
                config_store.save_config(&config).await?;
                eprintln!("Saved configuration to {}", config_store.path().display());
            }
        }
        Some(("serve", _)) | None => serve(&config).await?,
        _ => {
            eprintln!("Unknown command");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn serve(config: &AppConfig) -> Result<()> {
    // Create dependencies
    let repository = Arc::new(InMemoryTaskRepository::new());
    let cache = Arc::new(MokaTaskCache::from_config(config));

    // Create application services
    let service = Arc::new(TaskService::new(repository, cache));
    let operations = Arc::new(TaskOperations::new(service));
    let server = StdioServer::new(operations, config.default_page_size);

    tracing::info!(
        "Serving on stdin/stdout (default page size {})",
        config.default_page_size
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server.run(stdin, tokio::io::stdout()).await?;

    Ok(())
}
