use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use lastmile_providers::config::LastmileConfig;
use mimalloc::MiMalloc;
use tracing::info;

use crate::{
    compare::CompareArgs,
    context::{AppContext, Overrides, load_catalog},
    geocode::GeocodeArgs,
    route::RouteArgs,
};

mod compare;
mod context;
mod export;
mod geocode;
mod interactive;
mod parsers;
mod places;
mod route;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log every provider call
    #[arg(short, long, global = true)]
    debug: bool,

    /// JSON catalog of origins and apartment complexes (default: built-in Hanam table)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// HTTP timeout per provider call (e.g., "12s", "PT30S")
    #[arg(long, global = true, value_parser = parsers::parse_duration)]
    timeout: Option<Duration>,

    /// How long fetched routes are reused (e.g., "30s", "5m")
    #[arg(long, global = true, value_parser = parsers::parse_duration)]
    route_ttl: Option<Duration>,
}

#[derive(Subcommand)]
enum Commands {
    /// List origins and apartment complexes
    Places,
    /// Compare the gate + walk plan against driving to the building front
    #[command(visible_alias = "c")]
    Compare {
        #[command(flatten)]
        args: CompareArgs,
    },
    /// Fetch one route through the provider fallback
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Look up free text with Mapbox geocoding
    Geocode {
        #[command(flatten)]
        args: GeocodeArgs,
    },
    /// Read "origin | apartment" selections from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let catalog = load_catalog(cli.catalog.as_deref())?;

    if matches!(cli.command, Some(Commands::Places) | None) {
        places::run(&catalog);
        return Ok(());
    }

    let context = AppContext::new(
        LastmileConfig::from_env()?,
        catalog,
        Overrides {
            timeout: cli.timeout,
            route_ttl: cli.route_ttl,
        },
    )?;
    info!("{}", context.status_line());

    match cli.command {
        Some(Commands::Compare { args }) => compare::run(&context, args).await?,
        Some(Commands::Route { args }) => route::run(&context, args).await?,
        Some(Commands::Geocode { args }) => geocode::run(&context, args).await?,
        Some(Commands::Interactive) => interactive::run(&context).await?,
        Some(Commands::Places) | None => {}
    }

    Ok(())
}
