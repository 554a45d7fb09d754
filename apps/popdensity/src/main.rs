//! `popdensity`: annotate road segments with nearby grid population.
//!
//! Reads a road CSV and a population grid CSV, runs the two-pass
//! assignment, and writes per-road densities, per-tile assignments, a JSON
//! coverage report, and GeoJSON maps of the busiest roads and the most
//! contested tiles to `--out-dir`.
//!
//! Run with:
//!   cargo run -p popdensity --release -- roads.csv --population grid.csv
//!
//! Settings come from `--config <file.json>` (an `AssignConfig`) when
//! given; individual flags override it.  Log level follows `RUST_LOG`
//! (default `info`).

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use pd_assign::{
    assign_density, load_roads_csv, AssignConfig, CoverageReport, DEFAULT_TOP_N,
};
use pd_core::DistanceKind;
use pd_output::{
    write_contested_tiles_geojson, write_outcome, write_report_json, write_top_roads_geojson,
    CsvWriter, CONTESTED_TILES_GEOJSON, COVERAGE_REPORT_JSON, TOP_ROADS_GEOJSON,
};
use pd_spatial::IndexStrategy;
use pd_tiles::{open_population_csv, DEFAULT_POPULATION_CSV};

#[derive(Parser, Debug)]
#[command(name = "popdensity")]
#[command(about = "Assign gridded population to the nearest road segments", long_about = None)]
struct Args {
    /// Road CSV (`id, lon, lat, geometry[, pop_density]`)
    #[arg(value_name = "ROADS")]
    roads: PathBuf,

    /// Population grid CSV (lon, lat, population in the first three columns)
    #[arg(long, default_value = DEFAULT_POPULATION_CSV)]
    population: PathBuf,

    /// JSON file with an assignment config; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tile half-width / box padding in degrees
    #[arg(long)]
    half_width: Option<f64>,

    /// The population file is sorted by ascending latitude
    #[arg(long, conflicts_with = "no_lat_sorted")]
    lat_sorted: bool,

    /// Read the whole population file even if the config says it is sorted
    #[arg(long)]
    no_lat_sorted: bool,

    /// Maximum tile-to-road distance in metres
    #[arg(long, conflicts_with = "no_threshold")]
    threshold: Option<f64>,

    /// Assign every tile in the box regardless of distance
    #[arg(long)]
    no_threshold: bool,

    /// Distance model (haversine, planar)
    #[arg(long)]
    distance: Option<DistanceKind>,

    /// Nearest-neighbour index (auto, linear, rtree)
    #[arg(long)]
    index: Option<IndexStrategy>,

    /// Length of the ranked lists in the report and the GeoJSON
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Output directory
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Also write `output.db`
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: bool,
}

impl Args {
    fn assign_config(&self) -> Result<AssignConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<AssignConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => AssignConfig::default(),
        };

        if let Some(w) = self.half_width {
            config = config.tile_half_width(w);
        }
        if self.lat_sorted {
            config = config.assume_lat_sorted(true);
        } else if self.no_lat_sorted {
            config = config.assume_lat_sorted(false);
        }
        if self.no_threshold {
            config = config.threshold_m(None);
        } else if let Some(t) = self.threshold {
            config = config.threshold_m(Some(t));
        }
        if let Some(d) = self.distance {
            config = config.distance(d);
        }
        if let Some(i) = self.index {
            config = config.index(i);
        }

        config.validate().context("invalid assignment config")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.assign_config()?;
    log::info!(
        "config: half-width {}°, threshold {}, distance {}, index {}, lat-sorted {}",
        config.tile_half_width_deg,
        config
            .distance_threshold_m
            .map_or_else(|| "none".to_string(), |t| format!("{t} m")),
        config.distance,
        config.index,
        config.assume_lat_sorted,
    );

    let t0 = Instant::now();
    let roads = load_roads_csv(&args.roads)
        .with_context(|| format!("loading roads from {}", args.roads.display()))?;
    let rows = open_population_csv(&args.population)
        .with_context(|| format!("opening population grid {}", args.population.display()))?;

    let outcome = assign_density(&roads, rows, &config).context("assigning population")?;
    log::info!("assignment finished in {:.2?}", t0.elapsed());

    let report = CoverageReport::build(&roads, &outcome, args.top_n);
    report.log_summary();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut csv = CsvWriter::new(&args.out_dir)?;
    write_outcome(&mut csv, &roads, &outcome)?;

    #[cfg(feature = "sqlite")]
    write_sqlite(&args, &roads, &outcome)?;

    write_report_json(&args.out_dir.join(COVERAGE_REPORT_JSON), &report)?;
    write_top_roads_geojson(&args.out_dir.join(TOP_ROADS_GEOJSON), &roads, &outcome, args.top_n)?;
    write_contested_tiles_geojson(
        &args.out_dir.join(CONTESTED_TILES_GEOJSON),
        &roads,
        &outcome,
        args.top_n,
    )?;

    log::info!("results written to {} in {:.2?}", args.out_dir.display(), t0.elapsed());
    Ok(())
}

#[cfg(feature = "sqlite")]
fn write_sqlite(
    args:    &Args,
    roads:   &[pd_assign::RoadSegment],
    outcome: &pd_assign::AssignOutcome,
) -> Result<()> {
    if args.sqlite {
        let mut db = pd_output::SqliteWriter::new(&args.out_dir)?;
        write_outcome(&mut db, roads, outcome)?;
    }
    Ok(())
}
