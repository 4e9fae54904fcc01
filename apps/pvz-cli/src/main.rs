use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use pvz::config::PvzConfig;
use pvz::contract::client::PvzApi;
use pvz::contract::model::{ProductType, ReportFilter, ReportQuery, Role, UnknownVariant};
use pvz::domain::ports::SystemClock;
use pvz::domain::service::{Service, ServiceConfig};
use pvz::gateways::local::PvzLocalClient;
use pvz::infra::metrics::AtomicCounters;
use pvz::infra::storage::migrations::Migrator;
use pvz::infra::storage::SeaOrmLedgerStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// PVZ ledger - operate pickup points, receptions and products
#[derive(Parser)]
#[command(name = "pvz-cli")]
#[command(about = "PVZ ledger - operate pickup points, receptions and products")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL (overrides config)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Caller {
    /// Role of the caller (moderator or employee)
    #[arg(long, value_parser = parse_role)]
    role: Role,
}

#[derive(Args)]
struct AtPoint {
    #[command(flatten)]
    caller: Caller,

    /// Pickup point id
    #[arg(long)]
    point_id: Uuid,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a pickup point
    CreatePoint {
        #[command(flatten)]
        caller: Caller,
        /// City of the point (Москва, Санкт-Петербург, Казань)
        #[arg(long)]
        city: String,
    },
    /// List all pickup points
    ListPoints,
    /// Paged report of points with their receptions and products
    Report {
        /// Only receptions created at or after this RFC 3339 instant
        #[arg(long, value_parser = parse_instant)]
        from: Option<DateTime<Utc>>,
        /// Only receptions created at or before this RFC 3339 instant
        #[arg(long, value_parser = parse_instant)]
        to: Option<DateTime<Utc>>,
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Open a reception at a point
    OpenReception(AtPoint),
    /// Register a product in the point's active reception
    AddProduct {
        #[command(flatten)]
        at: AtPoint,
        /// Product type (электроника, одежда, обувь)
        #[arg(long = "type", value_parser = parse_product_type)]
        product_type: ProductType,
    },
    /// Close the point's active reception
    CloseReception(AtPoint),
    /// Remove the most recent product of the point's active reception
    DeleteLastProduct(AtPoint),
    /// Check configuration and database connectivity
    Check,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: UnknownVariant| e.to_string())
}

fn parse_product_type(s: &str) -> Result<ProductType, String> {
    s.parse().map_err(|e: UnknownVariant| e.to_string())
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        database_url: cli.database_url.clone(),
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::debug!(home_dir = %config.home_dir, "pvz-cli starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given, see --help");
    };

    let pvz_config: PvzConfig = config.module_config("pvz")?;
    let db = connect(&config).await?;

    let store = Arc::new(SeaOrmLedgerStore::new(db, Arc::new(SystemClock)));
    let counters = AtomicCounters::new();
    let service = Arc::new(Service::new(
        store,
        counters.counters(),
        ServiceConfig::from(&pvz_config),
    ));
    let client = PvzLocalClient::new(service);

    run_command(&client, command).await
}

/// Open the configured database and bring its schema up to date.
async fn connect(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config.database.clone().unwrap_or_default();
    let url = db_config.resolved_url(Path::new(&config.home_dir))?;

    let mut opts = ConnectOptions::new(url);
    opts.max_connections(db_config.max_conns.unwrap_or(10))
        .sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    Ok(db)
}

async fn run_command(client: &dyn PvzApi, command: Commands) -> Result<()> {
    match command {
        Commands::CreatePoint { caller, city } => {
            print_json(&client.create_point(caller.role, &city).await?)
        }
        Commands::ListPoints => print_json(&client.list_points().await?),
        Commands::Report {
            from,
            to,
            page,
            limit,
        } => {
            let query = ReportQuery {
                filter: ReportFilter {
                    date_from: from,
                    date_to: to,
                },
                page,
                limit,
            };
            print_json(&client.list_points_extended(query).await?)
        }
        Commands::OpenReception(at) => {
            print_json(&client.open_reception(at.caller.role, at.point_id).await?)
        }
        Commands::AddProduct { at, product_type } => print_json(
            &client
                .add_product(at.caller.role, at.point_id, product_type)
                .await?,
        ),
        Commands::CloseReception(at) => print_json(
            &client
                .close_last_reception(at.caller.role, at.point_id)
                .await?,
        ),
        Commands::DeleteLastProduct(at) => {
            let outcome = client
                .delete_last_product(at.caller.role, at.point_id)
                .await?;
            print_json(&serde_json::json!({ "outcome": outcome }))
        }
        Commands::Check => {
            tracing::info!("configuration and database are ok");
            print_json(&serde_json::json!({ "status": "ok" }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
