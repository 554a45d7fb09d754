//! Unit and end-to-end tests for pd-assign.

use pd_core::GeoPoint;
use pd_tiles::{RawRow, TilesResult};

use crate::{AssignConfig, RoadSegment};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rows(data: &[(&str, &str, &str)]) -> Vec<TilesResult<RawRow>> {
    data.iter().map(|&(lon, lat, v)| Ok(RawRow::new(lon, lat, v))).collect()
}

fn road(id: &str, lon: f64, lat: f64) -> RoadSegment {
    RoadSegment::new(id).with_coord(GeoPoint::new(lon, lat))
}

/// Two roads 0.01° apart on the 47th parallel.
fn two_roads() -> Vec<RoadSegment> {
    vec![road("a", 10.0, 47.0), road("b", 10.01, 47.0)]
}

/// Three tiles near [`two_roads`] plus one row far outside their box.
fn three_tiles_and_outlier() -> Vec<TilesResult<RawRow>> {
    rows(&[
        ("10.0", "47.0", "5"),
        ("10.01", "47.0", "4"),
        ("10.004", "47.0001", "6"),
        ("11.0", "47.0", "100"),
    ])
}

/// Deterministic pseudo-random lattice offsets (64-bit LCG).
fn jitter(seed: &mut u64) -> f64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    ((*seed >> 11) as f64 / (1u64 << 53) as f64) - 0.5
}

/// `n_roads` roads and `n_tiles` tile rows scattered over ~0.02° × 0.02°.
fn scatter(n_roads: usize, n_tiles: usize) -> (Vec<RoadSegment>, Vec<(String, String, String)>) {
    let mut seed = 7;
    let roads = (0..n_roads)
        .map(|i| {
            road(
                &format!("r{i}"),
                10.0 + 0.02 * jitter(&mut seed),
                47.0 + 0.02 * jitter(&mut seed),
            )
        })
        .collect();
    let tiles = (0..n_tiles)
        .map(|i| {
            let lon = 10.0 + 0.02 * jitter(&mut seed);
            let lat = 47.0 + 0.02 * jitter(&mut seed);
            (format!("{lon:.6}"), format!("{lat:.6}"), format!("{}", 1 + i % 9))
        })
        .collect();
    (roads, tiles)
}

fn owned_rows(data: &[(String, String, String)]) -> Vec<TilesResult<RawRow>> {
    data.iter()
        .map(|(lon, lat, v)| Ok(RawRow::new(lon.as_str(), lat.as_str(), v.as_str())))
        .collect()
}

fn no_threshold() -> AssignConfig {
    AssignConfig::default().threshold_m(None)
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use pd_core::{DistanceKind, PdError};
    use pd_spatial::IndexStrategy;

    use crate::{AssignConfig, DEFAULT_TILE_HALF_WIDTH_DEG};

    #[test]
    fn defaults() {
        let c = AssignConfig::default();
        assert_eq!(c.tile_half_width_deg, DEFAULT_TILE_HALF_WIDTH_DEG);
        assert_eq!(c.distance_threshold_m, Some(100.0));
        assert!(!c.assume_lat_sorted);
        assert_eq!(c.distance, DistanceKind::Haversine);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        for c in [
            AssignConfig::default().tile_half_width(0.0),
            AssignConfig::default().tile_half_width(f64::NAN),
            AssignConfig::default().threshold_m(Some(-1.0)),
            AssignConfig::default().threshold_m(Some(f64::INFINITY)),
        ] {
            assert!(matches!(c.validate(), Err(PdError::Config(_))), "{c:?}");
        }
        assert!(AssignConfig::default().threshold_m(Some(0.0)).validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: AssignConfig = serde_json::from_str(
            r#"{ "distance_threshold_m": null, "distance": "planar", "index": { "kind": "r_tree" } }"#,
        )
        .unwrap();
        assert_eq!(c.distance_threshold_m, None);
        assert_eq!(c.distance, DistanceKind::Planar);
        assert_eq!(c.index, IndexStrategy::RTree);
        assert_eq!(c.tile_half_width_deg, DEFAULT_TILE_HALF_WIDTH_DEG);
    }
}

// ── Road centres and box ──────────────────────────────────────────────────────

#[cfg(test)]
mod centers {
    use approx::assert_relative_eq;

    use pd_core::{GeoPoint, PdError, RoadIdx};

    use crate::{padded_extent, resolve_centers, RoadSegment};

    #[test]
    fn geometry_centroid_wins_over_coord() {
        let r = RoadSegment::new("x")
            .with_geometry(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(2.0, 0.0)])
            .with_coord(GeoPoint::new(5.0, 5.0));
        let c = r.center().unwrap();
        assert_relative_eq!(c.lon, 1.0);
        assert_relative_eq!(c.lat, 0.0);
    }

    #[test]
    fn empty_geometry_falls_back_to_coord() {
        let r = RoadSegment::new("x").with_geometry(vec![]).with_coord(GeoPoint::new(5.0, 6.0));
        assert_eq!(r.center(), Some(GeoPoint::new(5.0, 6.0)));
    }

    #[test]
    fn non_finite_coord_is_unresolvable() {
        let r = RoadSegment::new("x").with_coord(GeoPoint::new(f64::NAN, 1.0));
        assert_eq!(r.center(), None);
        assert_eq!(RoadSegment::new("y").center(), None);
    }

    #[test]
    fn missing_centres_are_listed() {
        let roads = vec![
            RoadSegment::new("a").with_coord(GeoPoint::new(1.0, 1.0)),
            RoadSegment::new("b"),
            RoadSegment::new("c").with_coord(GeoPoint::new(2.0, 2.0)),
        ];
        let c = resolve_centers(&roads);
        assert_eq!(c.len(), 2);
        assert_eq!(c.road_idx, vec![RoadIdx(0), RoadIdx(2)]);
        assert_eq!(c.missing, vec![RoadIdx(1)]);
    }

    #[test]
    fn extent_is_padded() {
        let pts = [GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];
        let b = padded_extent(&pts, 0.5).unwrap();
        assert_relative_eq!(b.west, 0.5);
        assert_relative_eq!(b.east, 3.5);
        assert_relative_eq!(b.south, 1.5);
        assert_relative_eq!(b.north, 4.5);
    }

    #[test]
    fn empty_extent_is_an_error() {
        assert!(matches!(padded_extent(&[], 0.5), Err(PdError::EmptyInput(_))));
    }
}

// ── Engine scenarios ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use approx::assert_relative_eq;

    use pd_core::{RoadIdx, TileIdx};

    use crate::{assign_density, AssignConfig, AssignPass, AssignStatus, CoverageReport};

    use super::{road, rows, three_tiles_and_outlier, two_roads};

    #[test]
    fn two_roads_three_tiles_wide_threshold() {
        let roads = two_roads();
        let cfg = AssignConfig::default().threshold_m(Some(2000.0));
        let out = assign_density(&roads, three_tiles_and_outlier(), &cfg).unwrap();

        assert_eq!(out.status, AssignStatus::Completed);
        assert_eq!(out.tiles.len(), 3);
        assert_eq!(out.filter_stats.rows_outside_bbox, 1);
        assert_eq!(out.stats.tiles_used_pass1, 2);
        assert_eq!(out.stats.tiles_used_pass2, 1);
        assert_eq!(out.stats.tiles_too_far, 0);
        assert_relative_eq!(out.road_density[0], 11.0);
        assert_relative_eq!(out.road_density[1], 4.0);
        assert_relative_eq!(out.road_density.iter().sum::<f64>(), 15.0);

        let late = out.assignments.iter().find(|a| a.pass == AssignPass::TileToRoad).unwrap();
        assert_eq!(late.road, RoadIdx(0));
        assert_eq!(out.tiles.get(late.tile).key.lon, "10.004");

        let report = CoverageReport::build(&roads, &out, 10);
        assert_eq!(report.tiles.rows_outside_bbox, 1);
        assert_eq!(report.tiles.fraction_used, Some(1.0));
    }

    #[test]
    fn zero_threshold_without_coincidence_assigns_nothing() {
        let roads = two_roads();
        let src = rows(&[("10.0001", "47.0001", "3"), ("10.0099", "46.9999", "2")]);
        let cfg = AssignConfig::default().threshold_m(Some(0.0));
        let out = assign_density(&roads, src, &cfg).unwrap();

        assert_eq!(out.status, AssignStatus::Completed);
        assert!(out.assignments.is_empty());
        assert!(out.road_density.iter().all(|&d| d == 0.0));
        assert_eq!(out.stats.pass1_too_far, 2);
        assert_eq!(out.stats.tiles_too_far, 2);

        let report = CoverageReport::build(&roads, &out, 10);
        assert_eq!(report.population.fraction_assigned, Some(0.0));
        assert_relative_eq!(report.population.uncovered, 5.0);
        assert!(report.density.is_none());
    }

    #[test]
    fn duplicate_keys_are_assigned_whole() {
        let roads = vec![road("only", 10.0, 47.0)];
        let src = rows(&[("10.0", "47.0", "5"), ("10.0", "47.0", "7")]);
        let out = assign_density(&roads, src, &AssignConfig::default()).unwrap();

        assert_eq!(out.tiles.len(), 1);
        assert_eq!(out.assignments.len(), 1);
        assert_relative_eq!(out.assignments[0].pop, 12.0);
        assert_relative_eq!(out.road_density[0], 12.0);
    }

    #[test]
    fn coincident_roads_tie_to_lowest_index() {
        let roads = vec![road("first", 10.0, 47.0), road("second", 10.0, 47.0)];
        let src = rows(&[("10.0", "47.0", "8")]);
        let out = assign_density(&roads, src, &AssignConfig::default()).unwrap();

        assert_eq!(out.assignments.len(), 1);
        assert_eq!(out.assignments[0].road, RoadIdx(0));
        assert_eq!(out.stats.pass1_conflicts, 1);
        assert_eq!(out.road_density, vec![8.0, 0.0]);
    }

    #[test]
    fn closer_road_wins_contested_tile() {
        // All three roads propose the same tile; road 2 sits on it.
        let roads = vec![
            road("far", 10.00002, 47.0),
            road("near", 10.00001, 47.0),
            road("on", 10.0, 47.0),
        ];
        let src = rows(&[("10.0", "47.0", "5")]);
        let out = assign_density(&roads, src, &AssignConfig::default().threshold_m(None)).unwrap();

        let first = out.assignments.iter().find(|a| a.pass == AssignPass::RoadToTile).unwrap();
        assert_eq!(first.road, RoadIdx(2));
        assert_eq!(out.stats.pass1_conflicts, 2);
        assert_relative_eq!(out.road_density[2], 5.0);

        assert_eq!(out.tile_proposals, vec![3]);
        assert_eq!(out.contested_tiles(), vec![TileIdx(0)]);
        assert_eq!(out.road_for_tile(TileIdx(0)), Some(RoadIdx(2)));
    }

    #[test]
    fn planar_model_agrees_on_small_boxes() {
        let roads = two_roads();
        let cfg = AssignConfig::default()
            .threshold_m(Some(2000.0))
            .distance(pd_core::DistanceKind::Planar);
        let out = assign_density(&roads, three_tiles_and_outlier(), &cfg).unwrap();
        assert_relative_eq!(out.road_density[0], 11.0);
        assert_relative_eq!(out.road_density[1], 4.0);
    }
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use pd_spatial::IndexStrategy;

    use crate::{assign_density, AssignConfig, AssignStatus};

    use super::{no_threshold, owned_rows, scatter};

    #[test]
    fn conservation_without_threshold() {
        let (roads, tiles) = scatter(40, 400);
        let out = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();

        assert_eq!(out.stats.tiles_too_far, 0);
        let total: f64 = out.road_density.iter().sum();
        assert_relative_eq!(total, out.tiles.total_pop(), epsilon = 1e-9);
    }

    #[test]
    fn conservation_with_threshold() {
        let (roads, tiles) = scatter(40, 400);
        let cfg = AssignConfig::default().threshold_m(Some(150.0));
        let out = assign_density(&roads, owned_rows(&tiles), &cfg).unwrap();

        let total: f64 = out.road_density.iter().sum();
        assert_relative_eq!(total, out.total_assigned(), epsilon = 1e-9);
        assert!(total <= out.tiles.total_pop());
        let used = (out.stats.tiles_used_pass1 + out.stats.tiles_used_pass2) as usize;
        assert_eq!(used + out.stats.tiles_too_far as usize, out.tiles.len());
    }

    #[test]
    fn every_tile_assigned_at_most_once() {
        let (roads, tiles) = scatter(60, 300);
        let out = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();

        let mut seen = HashSet::new();
        for a in &out.assignments {
            assert!(seen.insert(a.tile), "tile {} assigned twice", a.tile);
        }
        assert_eq!(seen.len(), out.tiles.len());
    }

    #[test]
    fn proposals_account_for_conflicts() {
        let (roads, tiles) = scatter(60, 40);
        let out = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();

        assert_eq!(out.tile_proposals.len(), out.tiles.len());
        let proposed: u64 = out.tile_proposals.iter().map(|&p| p as u64).sum();
        assert_eq!(proposed, roads.len() as u64);
        let extra: u64 = out.tile_proposals.iter().map(|&p| p.saturating_sub(1) as u64).sum();
        assert_eq!(extra, out.stats.pass1_conflicts);

        let contested = out.contested_tiles();
        assert!(!contested.is_empty());
        assert!(contested
            .windows(2)
            .all(|w| out.tile_proposals[w[0].index()] >= out.tile_proposals[w[1].index()]));
        assert!(contested.iter().all(|&t| out.road_for_tile(t).is_some()));
    }

    #[test]
    fn threshold_is_monotone() {
        let (roads, tiles) = scatter(30, 300);
        let mut last = -1.0;
        for t in [Some(0.0), Some(25.0), Some(100.0), Some(400.0), Some(5000.0), None] {
            let cfg = AssignConfig::default().threshold_m(t);
            let out = assign_density(&roads, owned_rows(&tiles), &cfg).unwrap();
            let assigned = out.total_assigned();
            assert!(assigned >= last, "threshold {t:?}: {assigned} < {last}");
            last = assigned;
        }
    }

    #[test]
    fn linear_scan_and_rtree_agree() {
        let (roads, tiles) = scatter(50, 500);
        let lin = no_threshold().index(IndexStrategy::LinearScan);
        let tree = no_threshold().index(IndexStrategy::RTree);
        let a = assign_density(&roads, owned_rows(&tiles), &lin).unwrap();
        let b = assign_density(&roads, owned_rows(&tiles), &tree).unwrap();

        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.road_density, b.road_density);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn rerun_on_annotated_roads_is_a_no_op() {
        let (mut roads, tiles) = scatter(10, 50);
        let first = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();
        first.apply_to(&mut roads);
        let before: Vec<_> = roads.iter().map(|r| r.pop_density).collect();

        let second = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();
        assert_eq!(second.status, AssignStatus::AlreadyAnnotated);
        assert_eq!(second.road_density, first.road_density);
        assert!(second.assignments.is_empty());

        second.apply_to(&mut roads);
        let after: Vec<_> = roads.iter().map(|r| r.pop_density).collect();
        assert_eq!(before, after);
    }
}

// ── Empty data and errors ─────────────────────────────────────────────────────

#[cfg(test)]
mod degenerate {
    use pd_core::{PdError, RoadIdx};
    use pd_tiles::{RawRow, TilesError, TilesResult};

    use crate::{assign_density, AssignConfig, AssignError, AssignStatus, RoadSegment};

    use super::{road, rows, two_roads};

    #[test]
    fn no_resolvable_centre_is_no_roads() {
        let roads = vec![RoadSegment::new("a"), RoadSegment::new("b")];
        let out = assign_density(&roads, rows(&[("0", "0", "1")]), &AssignConfig::default())
            .unwrap();
        assert_eq!(out.status, AssignStatus::NoRoads);
        assert_eq!(out.road_density, vec![0.0, 0.0]);
        assert_eq!(out.roads_without_center, vec![RoadIdx(0), RoadIdx(1)]);
        assert!(out.bbox.is_none());
    }

    #[test]
    fn empty_road_set_is_no_roads() {
        let out = assign_density(&[], rows(&[]), &AssignConfig::default()).unwrap();
        assert_eq!(out.status, AssignStatus::NoRoads);
        assert!(out.road_density.is_empty());
    }

    #[test]
    fn no_rows_in_box_is_no_tiles() {
        let out =
            assign_density(&two_roads(), rows(&[("50", "50", "1")]), &AssignConfig::default())
                .unwrap();
        assert_eq!(out.status, AssignStatus::NoTiles);
        assert_eq!(out.filter_stats.rows_outside_bbox, 1);
        assert_eq!(out.road_density, vec![0.0, 0.0]);
    }

    #[test]
    fn roads_without_centre_keep_zero() {
        let roads = vec![road("a", 10.0, 47.0), RoadSegment::new("ghost")];
        let out = assign_density(&roads, rows(&[("10.0", "47.0", "3")]), &AssignConfig::default())
            .unwrap();
        assert_eq!(out.status, AssignStatus::Completed);
        assert_eq!(out.road_density, vec![3.0, 0.0]);
        assert_eq!(out.roads_without_center, vec![RoadIdx(1)]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = AssignConfig::default().tile_half_width(-1.0);
        let err = assign_density(&two_roads(), rows(&[]), &cfg).unwrap_err();
        assert!(matches!(err, AssignError::Core(PdError::Config(_))));
    }

    #[test]
    fn io_error_in_row_stream_is_fatal() {
        let src: Vec<TilesResult<RawRow>> = vec![
            Ok(RawRow::new("10.0", "47.0", "1")),
            Err(TilesError::Io(std::io::Error::other("gone"))),
        ];
        let err = assign_density(&two_roads(), src, &AssignConfig::default()).unwrap_err();
        assert!(matches!(err, AssignError::Tiles(TilesError::Io(_))));
    }
}

// ── Road loader ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use approx::assert_relative_eq;

    use pd_core::GeoPoint;

    use crate::{load_roads_csv, load_roads_reader, AssignError};

    #[test]
    fn reads_geometry_coords_and_blanks() {
        let csv = "id,lon,lat,geometry\n\
                   1,,,\"LINESTRING (0 0, 2 0)\"\n\
                   2,10.5,47.25,\n\
                   3,,,\n";
        let roads = load_roads_reader(Cursor::new(csv)).unwrap();
        assert_eq!(roads.len(), 3);

        let c = roads[0].center().unwrap();
        assert_relative_eq!(c.lon, 1.0);
        assert_eq!(roads[1].center(), Some(GeoPoint::new(10.5, 47.25)));
        assert_eq!(roads[2].center(), None);
        assert!(roads.iter().all(|r| !r.is_annotated()));
        assert_eq!(roads[1].id.as_str(), "2");
    }

    #[test]
    fn pop_density_column_marks_annotated() {
        let csv = "id,lon,lat,geometry,pop_density\nx,1,2,,4.5\ny,1,2,,\n";
        let roads = load_roads_reader(Cursor::new(csv)).unwrap();
        assert_eq!(roads[0].pop_density, Some(4.5));
        assert_eq!(roads[1].pop_density, None);
    }

    #[test]
    fn bad_wkt_is_a_road_error() {
        let csv = "id,lon,lat,geometry\nbad,,,\"POLYGON ((0 0, 1 1))\"\n";
        let err = load_roads_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, AssignError::RoadParse { ref id, .. } if id == "bad"));

        let csv = "id,lon,lat,geometry\nbad,,,\"LINESTRING (0 0, 1)\"\n";
        assert!(load_roads_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.csv");
        let err = load_roads_csv(&path).unwrap_err();
        assert!(matches!(err, AssignError::RoadSourceNotFound(p) if p == path));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.csv");
        std::fs::write(&path, "id,lon,lat,geometry\na,1,2,\n").unwrap();
        assert_eq!(load_roads_csv(&path).unwrap().len(), 1);
    }
}

// ── Coverage report ───────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use approx::assert_relative_eq;

    use crate::{
        assign_density, AssignConfig, AssignPass, AssignStatus, CoverageReport, DensityStats,
        RoadSegment,
    };

    use super::{no_threshold, owned_rows, road, scatter, three_tiles_and_outlier, two_roads};

    #[test]
    fn density_stats() {
        let s = DensityStats::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.median, 2.5);
        assert_relative_eq!(s.stdev, 1.25f64.sqrt());
        assert_relative_eq!(s.total, 10.0);

        let odd = DensityStats::from_values(&[9.0, 1.0, 5.0]).unwrap();
        assert_eq!(odd.median, 5.0);
        assert!(DensityStats::from_values(&[]).is_none());
    }

    #[test]
    fn rankings_and_lists() {
        let mut roads = two_roads();
        roads.push(road("mid", 10.005, 47.0));
        roads.push(RoadSegment::new("ghost"));
        let cfg = AssignConfig::default().threshold_m(Some(2000.0));
        let out = assign_density(&roads, three_tiles_and_outlier(), &cfg).unwrap();
        let r = CoverageReport::build(&roads, &out, 2);

        assert_eq!(r.status, AssignStatus::Completed);
        assert_eq!(r.roads.total, 4);
        assert_eq!(r.roads.without_center, 1);
        assert_eq!(r.roads_without_center[0].as_str(), "ghost");

        assert_eq!(r.top_by_population.len(), 2);
        assert!(r.top_by_population[0].pop_density >= r.top_by_population[1].pop_density);
        assert_eq!(r.top_by_tile_count.len(), 2);

        let ids: Vec<_> = r.roads_without_assignment.iter().map(|s| s.as_str()).collect();
        assert!(ids.contains(&"ghost"));
        assert_eq!(r.roads.with_zero_assignments, Some(ids.len() as u64));
        assert_eq!(r.roads.with_population + ids.len() as u64, 4);
        assert!(r.top_by_tile_count.iter().all(|e| e.tile_count.is_some()));

        assert_eq!(r.farthest_assignments.len(), 2);
        assert!(r.farthest_assignments[0].distance_m >= r.farthest_assignments[1].distance_m);
        assert_relative_eq!(r.population.assigned, 15.0);
        assert_relative_eq!(r.population.fraction_assigned.unwrap(), 1.0);
        assert!(r.density.is_some());
    }

    #[test]
    fn farthest_assignment_names_tile_and_pass() {
        let roads = two_roads();
        let cfg = AssignConfig::default().threshold_m(Some(2000.0));
        let out = assign_density(&roads, three_tiles_and_outlier(), &cfg).unwrap();
        let r = CoverageReport::build(&roads, &out, 1);

        let far = &r.farthest_assignments[0];
        assert_eq!(far.tile_key, "10.004,47.0001");
        assert_eq!(far.segment_id.as_str(), "a");
        assert_eq!(far.pass, AssignPass::TileToRoad);
    }

    #[test]
    fn serialises_to_json() {
        let roads = two_roads();
        let out = assign_density(&roads, three_tiles_and_outlier(), &AssignConfig::default())
            .unwrap();
        let json = serde_json::to_value(CoverageReport::build(&roads, &out, 5)).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["distance"], "haversine");
        assert_eq!(json["tiles"]["considered"], 3);
    }

    #[test]
    fn annotated_rerun_ranks_existing_densities() {
        let (mut roads, tiles) = scatter(10, 50);
        assign_density(&roads, owned_rows(&tiles), &no_threshold())
            .unwrap()
            .apply_to(&mut roads);

        let again = assign_density(&roads, owned_rows(&tiles), &no_threshold()).unwrap();
        assert_eq!(again.status, AssignStatus::AlreadyAnnotated);
        let r = CoverageReport::build(&roads, &again, 3);

        let with_pop = roads.iter().filter(|r| r.pop_density.unwrap_or(0.0) > 0.0).count();
        assert_eq!(r.roads.with_population as usize, with_pop);
        assert_eq!(r.roads.with_zero_assignments, None);
        assert_eq!(r.top_by_population.len(), with_pop.min(3));
        assert!(r.top_by_population[0].pop_density >= r.top_by_population[1].pop_density);
        assert!(r.top_by_population.iter().all(|e| e.tile_count.is_none()));
        assert!(r.top_by_tile_count.is_empty());
        assert!(r.roads_without_assignment.is_empty());
        assert!(r.farthest_assignments.is_empty());
    }

    #[test]
    fn empty_outcome_has_no_fractions() {
        let roads = vec![RoadSegment::new("a")];
        let out = assign_density(&roads, Vec::new(), &AssignConfig::default()).unwrap();
        let r = CoverageReport::build(&roads, &out, 10);
        assert_eq!(r.status, AssignStatus::NoRoads);
        assert_eq!(r.tiles.fraction_used, None);
        assert_eq!(r.population.fraction_assigned, None);
        assert!(r.density.is_none());
    }
}
