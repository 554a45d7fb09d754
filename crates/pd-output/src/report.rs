//! JSON coverage report and GeoJSON exports.
//!
//! Two maps sit next to the report: the busiest roads (by tile count) and
//! the most contested tiles (by pass-1 proposals).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value};

use pd_assign::{AssignOutcome, CoverageReport, RoadSegment};

use crate::OutputResult;

pub const COVERAGE_REPORT_JSON: &str = "coverage_report.json";
pub const TOP_ROADS_GEOJSON: &str = "top_roads.geojson";
pub const CONTESTED_TILES_GEOJSON: &str = "contested_tiles.geojson";

/// Pretty-print `report` to `path`.
pub fn write_report_json(path: &Path, report: &CoverageReport) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, report)?;
    out.write_all(b"\n")?;
    out.flush()?;
    log::info!("wrote coverage report to {}", path.display());
    Ok(())
}

/// Write the `top_n` roads with the most tiles as a GeoJSON
/// `FeatureCollection`.
///
/// Roads keep their polyline when they have one and are exported as their
/// centre point otherwise.  Roads without any tile are never exported.
pub fn write_top_roads_geojson(
    path:    &Path,
    roads:   &[RoadSegment],
    outcome: &AssignOutcome,
    top_n:   usize,
) -> OutputResult<()> {
    let collection = top_roads_feature_collection(roads, outcome, top_n);
    write_collection(path, &collection)?;
    log::info!(
        "wrote {} roads by tile count to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Write the `top_n` tiles with the most pass-1 proposals as GeoJSON points.
pub fn write_contested_tiles_geojson(
    path:    &Path,
    roads:   &[RoadSegment],
    outcome: &AssignOutcome,
    top_n:   usize,
) -> OutputResult<()> {
    let collection = contested_tiles_feature_collection(roads, outcome, top_n);
    write_collection(path, &collection)?;
    log::info!(
        "wrote {} contested tiles to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Build the collection written by [`write_top_roads_geojson`].
pub fn top_roads_feature_collection(
    roads:   &[RoadSegment],
    outcome: &AssignOutcome,
    top_n:   usize,
) -> FeatureCollection {
    let counts = outcome.tile_counts();
    let mut ranked: Vec<usize> = (0..roads.len()).filter(|&i| counts[i] > 0).collect();
    ranked.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    let features = ranked
        .into_iter()
        .filter_map(|i| {
            let road = &roads[i];
            let mut feature = feature(road_geometry(road)?);
            feature.set_property("segment_id", road.id.as_str());
            feature.set_property("pop_density", outcome.road_density[i]);
            feature.set_property("tile_count", counts[i]);
            Some(feature)
        })
        .take(top_n)
        .collect();

    collection(features)
}

/// Build the collection written by [`write_contested_tiles_geojson`].
///
/// `segment_id` is the road that won the tile, `null` if none did.
pub fn contested_tiles_feature_collection(
    roads:   &[RoadSegment],
    outcome: &AssignOutcome,
    top_n:   usize,
) -> FeatureCollection {
    let features = outcome
        .contested_tiles()
        .into_iter()
        .take(top_n)
        .map(|t| {
            let tile = outcome.tiles.get(t);
            let point = Point::new(tile.center.lon, tile.center.lat);
            let mut feature = feature(Value::from(&point));
            feature.set_property("tile_key", tile.key.to_string());
            feature.set_property("pop", tile.pop);
            feature.set_property("proposals", outcome.tile_proposals[t.index()]);
            feature.set_property(
                "segment_id",
                outcome.road_for_tile(t).map(|r| roads[r.index()].id.as_str().to_owned()),
            );
            feature
        })
        .collect();

    collection(features)
}

fn road_geometry(road: &RoadSegment) -> Option<Value> {
    match &road.geometry {
        Some(pts) if pts.len() >= 2 => {
            let line: LineString<f64> = pts.iter().map(|p| (p.lon, p.lat)).collect();
            Some(Value::from(&line))
        }
        _ => road.center().map(|c| Value::from(&Point::new(c.lon, c.lat))),
    }
}

fn feature(value: Value) -> Feature {
    Feature {
        bbox:            None,
        geometry:        Some(Geometry::new(value)),
        id:              None,
        properties:      None,
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection { bbox: None, features, foreign_members: None }
}

fn write_collection(path: &Path, collection: &FeatureCollection) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, collection)?;
    out.flush()?;
    Ok(())
}
