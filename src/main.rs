use clap::Parser;
use color_eyre::Result;
use rec_distance::{
    config::Config,
    logging,
    models::{DistanceResult, SiteReport, TravelMode},
    sites::lookup_site_by_name,
    DistanceService,
};
use std::path::PathBuf;
use tracing::info;

/// Distances and travel times to Denver recreation centers.
#[derive(Parser, Debug)]
#[command(name = "rec-distance", version)]
struct Cli {
    /// Recompute even if the cached report is still close enough.
    #[arg(long)]
    refresh: bool,

    /// Remove the cached report and exit.
    #[arg(long)]
    clear_cache: bool,

    /// Print the site matching NAME and exit.
    #[arg(long, value_name = "NAME")]
    lookup: Option<String>,

    /// Print the full result as JSON instead of a table.
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::initialize_logging(&cli.log_dir);
    color_eyre::install()?;

    if let Some(name) = cli.lookup.as_deref() {
        match lookup_site_by_name(name) {
            Some(site) => println!(
                "{} - {} ({}, {})",
                site.name, site.address, site.latitude, site.longitude
            ),
            None => println!("No rec center matches \"{}\"", name),
        }
        return Ok(());
    }

    let config = Config::load(&cli.config);
    let service = DistanceService::from_config(&config)?;

    if cli.clear_cache {
        service.clear_cache();
        println!("Cache cleared.");
        return Ok(());
    }

    let mut print_progress = |message: &str, percent: f64| {
        if !cli.json {
            eprintln!("[{:>3.0}%] {}", percent, message);
        }
    };
    let result = service
        .get_distances(Some(&mut print_progress), cli.refresh)
        .await;
    info!("Distances ready (source: {})", result.source);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&result);
    }
    Ok(())
}

fn print_table(result: &DistanceResult) {
    if let Some(error) = &result.error {
        eprintln!("warning: {}", error);
    }
    let Some(report) = &result.data else {
        println!("No distance data available.");
        return;
    };

    println!(
        "{:<24} {:>8} {:>14} {:>14} {:>14}",
        "Rec center", "Miles", "Drive", "Bike", "Walk"
    );
    for row in &report.sites {
        println!(
            "{:<24} {:>8} {:>14} {:>14} {:>14}",
            row.name,
            row.straight_line_miles,
            travel_time(row, TravelMode::Driving),
            travel_time(row, TravelMode::Biking),
            travel_time(row, TravelMode::Walking),
        );
    }
    println!("\nSource: {}", result.source);
}

fn travel_time(row: &SiteReport, mode: TravelMode) -> &str {
    row.mode(mode).map(|d| d.human_time.as_str()).unwrap_or("-")
}
