use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use travel_planner::chart::{TravelMode, UNAVAILABLE_LABEL};
use travel_planner::{
    Dashboard, GeoJsonRouteDirectory, PlaneMetrics, PlannerConfig, SearchOutcome, TravelData,
    TripQuery, TripView, logging, web,
};

#[derive(Parser)]
#[command(
    name = "travelplanner",
    version,
    about = "Sustainable travel planner: compare train and plane duration and CO2 emissions"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API (and the front-end, if configured)
    Serve {
        /// Overrides server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Compare train and plane for one trip
    Compare {
        /// Departure city
        #[arg(long)]
        from: String,
        /// Destination city
        #[arg(long)]
        to: String,
        /// Number of people
        #[arg(short, long, default_value_t = 1)]
        passengers: u32,
        /// Double duration and emissions for the way back
        #[arg(long)]
        round_trip: bool,
    },
    /// List selectable cities
    Cities,
}

fn build_dashboard(config: &PlannerConfig) -> Result<Dashboard> {
    let data = TravelData::load(&config.data.trips_path, &config.data.coordinates_path)
        .context("Failed to load travel data")?;
    let routes = GeoJsonRouteDirectory::new(
        &config.data.routes_dir,
        config.data.pinned_route_city.clone(),
    );
    Ok(Dashboard::new(
        Arc::new(data),
        Arc::new(routes),
        config.projection.clone(),
    ))
}

fn print_trip(view: &TripView) {
    let mut table = Table::new();
    table.set_header(vec!["Mode", "Duration", "CO2 (kg)"]);
    table.add_row(vec![
        format!("{} Train", TravelMode::Train.icon()),
        view.metrics.train.duration_display(),
        format!("{:.1}", view.metrics.train.co2_kg),
    ]);
    match &view.metrics.plane {
        PlaneMetrics::Available(plane) => table.add_row(vec![
            format!("{} Plane", TravelMode::Plane.icon()),
            plane.duration_display(),
            format!("{:.1}", plane.co2_kg),
        ]),
        PlaneMetrics::Unavailable => table.add_row(vec![
            format!("{} Plane", TravelMode::Plane.icon()),
            UNAVAILABLE_LABEL.to_string(),
            UNAVAILABLE_LABEL.to_string(),
        ]),
    };

    let trip = if view.metrics.round_trip { "round trip" } else { "one way" };
    println!(
        "{} to {} ({}, {} passenger(s))",
        view.origin.name, view.destination.name, trip, view.metrics.passengers
    );
    println!("{table}");

    if let Some(transfers) = view.map.transfers {
        println!("Train transfers: {transfers}");
    }
    for notice in &view.notices {
        println!("Note: {notice}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let dashboard = build_dashboard(&config)?;
            info!("Serving {} routes", dashboard.data().trip_count());
            web::run(dashboard, &config).await?;
        }
        Command::Compare {
            from,
            to,
            passengers,
            round_trip,
        } => {
            let dashboard = build_dashboard(&config)?;
            let query = TripQuery::new(from, to)
                .with_passengers(passengers)
                .with_round_trip(round_trip);

            match dashboard.search(&query).map_err(|e| anyhow!(e.user_message()))? {
                SearchOutcome::Found(view) => print_trip(&view),
                SearchOutcome::NotFound { message } => println!("{message}"),
            }
        }
        Command::Cities => {
            let dashboard = build_dashboard(&config)?;
            let mut table = Table::new();
            table.set_header(vec!["City", "Longitude", "Latitude"]);
            for city in dashboard.data().cities() {
                table.add_row(vec![
                    city.name.clone(),
                    format!("{:.4}", city.longitude),
                    format!("{:.4}", city.latitude),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
