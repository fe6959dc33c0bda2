use anyhow::{Context, Result};
use azassist::azure::auth::{AzureCredentials, CredentialSource};
use azassist::azure::client::AzureClient;
use azassist::azure::http::format_azure_error;
use azassist::catalog::{self, Catalog, CatalogSnapshot};
use azassist::config::Config;
use azassist::interpreter::QueryInterpreter;
use azassist::nlu::ConversationClient;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Ask questions about your Azure resources
#[derive(Parser, Debug)]
#[command(name = "azassist", version, about, long_about = None)]
struct Args {
    /// Query to answer; reads queries from stdin when omitted
    query: Vec<String>,

    /// Print how many resource groups and resources were loaded
    #[arg(long)]
    summary: bool,

    /// List the resource type names the assistant understands
    #[arg(long)]
    list_types: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("azassist started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("azassist").join("azassist.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".azassist").join("azassist.log");
    }
    PathBuf::from("azassist.log")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    if args.list_types {
        for name in catalog::known_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let interpreter = initialize().await?;

    if args.summary {
        let catalog = interpreter.catalog();
        println!(
            "Loaded {} resource groups and {} resources",
            catalog.resource_groups().len(),
            catalog.resources().len()
        );
    }

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        let answer = interpreter
            .process_query(&query)
            .await
            .map_err(|e| anyhow::anyhow!(format_azure_error(&e)))?;
        println!("{}", answer.trim_end());
        return Ok(());
    }

    run_prompt(&interpreter).await
}

/// Read configuration, authenticate and take the subscription snapshot
async fn initialize() -> Result<QueryInterpreter> {
    let config = Config::load()?;
    tracing::info!("Using config: {:?}", config);

    let credentials = AzureCredentials::new(CredentialSource::from_env(&config.authority_host));
    let azure = AzureClient::new(
        credentials,
        &config.subscription_id,
        &config.management_endpoint,
    )?;

    let snapshot = CatalogSnapshot::load(&azure)
        .await
        .map_err(|e| anyhow::anyhow!(format_azure_error(&e)))
        .context("Failed to load subscription resources")?;

    let nlu = ConversationClient::new(
        &config.conversations_endpoint,
        &config.conversations_key,
        &config.project_name,
        &config.deployment_name,
    )?;

    Ok(QueryInterpreter::new(nlu, azure, Catalog::new(snapshot)))
}

/// Answer queries from stdin until EOF or "exit"
async fn run_prompt(interpreter: &QueryInterpreter) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        match interpreter.process_query(query).await {
            Ok(answer) => println!("{}", answer.trim_end()),
            Err(e) => {
                tracing::error!("Query failed: {:#}", e);
                eprintln!("Error: {}", format_azure_error(&e));
            }
        }
    }
}
