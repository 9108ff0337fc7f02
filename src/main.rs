use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use osanpo::{
    sdk::geo::Coordinate,
    sdk::map::{InMemoryMap, LogNotifier},
    sdk::mode::Mode,
    sdk::planner::RouteOutcome,
    sdk::poi::record::{Badge, PoiId},
    sdk::search::InputOutcome,
    sdk::util::log::init_logging,
    Backends, PlannerConfig, RecomputePolicy,
};
use serde::Serialize;
use std::{fs::File, io::Write, num::NonZeroUsize, path::PathBuf, time::Duration};

/// Plan walking routes and discover what is along the way
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a walking route and list the points of interest near it
    Route {
        /// Start position as "lat,lon" (e.g. "35.6812,139.7671")
        #[arg(long, allow_hyphen_values = true)]
        start: Coordinate,

        /// Goal position as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        goal: Coordinate,

        /// Intermediate waypoint, repeatable; visited in the given order
        #[arg(long = "via", allow_hyphen_values = true)]
        via: Vec<Coordinate>,

        /// [Optional] Keep every Nth route point for the POI lookup
        #[arg(long)]
        stride: Option<NonZeroUsize>,

        /// Also resolve a picture for every POI
        #[arg(long)]
        images: bool,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up addresses the way the search box does
    Search {
        query: String,
    },
}

#[derive(Serialize)]
struct RouteReport {
    distance_km: f64,
    geometry_points: usize,
    start: Coordinate,
    goal: Coordinate,
    waypoints: Vec<Coordinate>,
    pois: Vec<PoiReport>,
}

#[derive(Serialize)]
struct PoiReport {
    id: PoiId,
    name: String,
    position: Coordinate,
    badges: Vec<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = PlannerConfig::from_env().context("Invalid OSANPO_* configuration")?;
    let backends = Backends::from_config(&config).context("Failed to build the HTTP client")?;

    match cli.command {
        Command::Route {
            start,
            goal,
            via,
            stride,
            images,
            output,
        } => {
            let report = plan_route(&backends, start, goal, via, stride, images).await?;
            let json_output = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("Cannot create {}", path.display()))?;
                    file.write_all(json_output.as_bytes())?;
                    log::info!("Route report written to {}", path.display());
                }
                None => println!("{}", json_output),
            }
        }
        Command::Search { query } => search(&backends, &query).await?,
    }
    Ok(())
}

async fn plan_route(
    backends: &Backends,
    start: Coordinate,
    goal: Coordinate,
    via: Vec<Coordinate>,
    stride: Option<NonZeroUsize>,
    images: bool,
) -> anyhow::Result<RouteReport> {
    // The CLI places everything first and computes once.
    let mut planner = backends
        .planner(InMemoryMap::new(), LogNotifier)
        .with_policy(RecomputePolicy::Manual);
    if let Some(stride) = stride {
        planner = planner.with_stride(stride);
    }

    planner.select_mode(Mode::Start);
    planner.click(start).await;
    planner.select_mode(Mode::Way);
    for point in &via {
        planner.click(*point).await;
    }
    planner.select_mode(Mode::Goal);
    planner.click(goal).await;

    let outcome = planner
        .compute_route()
        .await
        .context("Route computation failed")?;
    let RouteOutcome::Computed { distance_meters, pois } = outcome else {
        bail!("Route was not computed: {:?}", outcome);
    };
    log::info!(
        "Walking route of {:.1} km with {} POIs nearby",
        distance_meters / 1000.0,
        pois
    );

    let ids: Vec<PoiId> = planner.pois().markers().iter().map(|m| m.record.id).collect();
    if images {
        for id in &ids {
            planner.open_poi_detail(*id).await;
        }
    }

    let geometry_points = planner.route().map_or(0, |r| r.geometry.len());
    let pois = planner
        .pois()
        .markers()
        .iter()
        .map(|m| PoiReport {
            id: m.record.id,
            name: m.detail.name.clone(),
            position: m.record.position,
            badges: m.detail.badges.clone(),
            description: m.detail.description.clone(),
            image: m.detail.image.url().map(str::to_string),
        })
        .collect();

    Ok(RouteReport {
        distance_km: distance_meters / 1000.0,
        geometry_points,
        start,
        goal,
        waypoints: via,
        pois,
    })
}

async fn search(backends: &Backends, query: &str) -> anyhow::Result<()> {
    let autocomplete = backends.autocomplete().with_debounce(Duration::ZERO);
    match autocomplete.on_input(query).await {
        InputOutcome::Shown(_) => {
            for suggestion in autocomplete.suggestions() {
                println!(
                    "{}\t{}\t{}",
                    suggestion.short_name(),
                    suggestion.position,
                    suggestion.display_name
                );
            }
        }
        InputOutcome::NoResults => println!("No results for \"{}\"", query),
        InputOutcome::Cleared => bail!("Query must be at least two characters"),
        InputOutcome::Failed => bail!("Address search failed, see the log for details"),
        InputOutcome::Superseded => bail!("Search was superseded"),
    }
    Ok(())
}
