//! Command-line entry point for the Revenue Statement Engine.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use revenue_engine::api::{AppState, create_router};
use revenue_engine::calculation::{StatementInputs, build_statement};
use revenue_engine::config::ConfigLoader;
use revenue_engine::error::{EngineError, EngineResult};
use revenue_engine::ingest::{
    DEFAULT_BOOKING_API_URL, DEFAULT_PER_PAGE, DEFAULT_RATES_CSV, HttpBookingSource, clean_bookings,
    fetch_all_bookings, read_bookings_file, read_rates_csv,
};
use revenue_engine::present::{DEFAULT_OUTPUT_CSV, render_table, write_csv};

#[derive(Parser)]
#[command(name = "revenue-engine", version, about = "Monthly revenue statements in a reference currency")]
struct Cli {
    /// Configuration directory holding engine.yaml and country_currency.yaml.
    /// The built-in configuration is used when omitted.
    #[arg(long, global = true, env = "REVENUE_CONFIG_DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the statement once: fetch, clean, aggregate, convert, print and export.
    Run(RunArgs),
    /// Serve the statement API over HTTP.
    Serve(ServeArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Booking API endpoint.
    #[arg(long, env = "REVENUE_API_URL", default_value = DEFAULT_BOOKING_API_URL)]
    api_url: String,

    /// Records requested per API page.
    #[arg(long, env = "REVENUE_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Read bookings from a JSON file instead of the API.
    #[arg(long, env = "REVENUE_BOOKINGS_FILE")]
    bookings_file: Option<PathBuf>,

    /// Daily exchange-rate CSV.
    #[arg(long, env = "REVENUE_RATES_CSV", default_value = DEFAULT_RATES_CSV)]
    rates: PathBuf,

    /// Statement CSV destination.
    #[arg(long, env = "REVENUE_OUTPUT_CSV", default_value = DEFAULT_OUTPUT_CSV)]
    output: PathBuf,

    /// Override the configured reference currency.
    #[arg(long, env = "REVENUE_REFERENCE_CURRENCY")]
    reference_currency: Option<String>,

    /// Print the full statement as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "REVENUE_LISTEN", default_value = "127.0.0.1:8080")]
    listen: String,
}

fn init_tracing() {
    let log_format = std::env::var("REVENUE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(dir: Option<&PathBuf>) -> EngineResult<ConfigLoader> {
    match dir {
        Some(dir) => ConfigLoader::load(dir),
        None => {
            info!("No configuration directory given, using built-in configuration");
            Ok(ConfigLoader::builtin())
        }
    }
}

async fn run(loader: ConfigLoader, args: RunArgs) -> EngineResult<()> {
    let mut config = loader.config().clone();
    if let Some(currency) = args.reference_currency {
        config.reference_currency = currency.trim().to_string();
    }

    let raw_bookings = match &args.bookings_file {
        Some(path) => read_bookings_file(path)?,
        None => {
            let source = HttpBookingSource::new(&args.api_url)?;
            info!(url = %source.url(), per_page = args.per_page, "Fetching bookings");
            fetch_all_bookings(&source, args.per_page).await?
        }
    };

    let cleaned = clean_bookings(raw_bookings);
    let exchange_rates = read_rates_csv(&args.rates)?;

    let inputs = StatementInputs {
        bookings: cleaned.bookings,
        exchange_rates,
        country_currencies: config.country_currencies.clone(),
    };
    let mut statement = build_statement(&inputs, &config)?;
    statement.report.cleaning = Some(cleaned.report);

    if args.json {
        let json = serde_json::to_string_pretty(&statement).map_err(|e| EngineError::ExportError {
            path: "stdout".to_string(),
            message: e.to_string(),
        })?;
        println!("{}", json);
    } else {
        print!("{}", render_table(&statement));
    }

    write_csv(&statement, &args.output)?;
    Ok(())
}

async fn serve(loader: ConfigLoader, args: ServeArgs) -> EngineResult<()> {
    let server_error = |e: std::io::Error| EngineError::ServerError {
        address: args.listen.clone(),
        message: e.to_string(),
    };

    let router = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .map_err(server_error)?;
    info!(address = %args.listen, "Statement API listening");
    axum::serve(listener, router).await.map_err(server_error)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match load_config(cli.config.as_ref()) {
        Ok(loader) => match cli.command {
            Command::Run(args) => run(loader, args).await,
            Command::Serve(args) => serve(loader, args).await,
        },
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Run failed");
            ExitCode::FAILURE
        }
    }
}
