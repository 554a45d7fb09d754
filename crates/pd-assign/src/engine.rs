//! Two-pass assignment engine.
//!
//! # Passes
//!
//! ```text
//! ① Road → tile   every road centre proposes its nearest tile; proposals
//!                 beyond the threshold are dropped; each tile keeps the
//!                 closest proposer (lowest road index on ties).
//! ② Tile → road   every tile nobody won goes to its nearest road, if that
//!                 road is within the threshold; otherwise it stays
//!                 unassigned.
//! ```
//!
//! Nearest-neighbour search runs in a local equirectangular plane centred on
//! the box; the threshold test and the reported distances use the run's
//! [`DistanceModel`](pd_core::DistanceModel).
//!
//! Bulk queries may run in parallel (feature `parallel`).  The per-tile
//! winner is chosen in one sequential reduction over the query results, so
//! a tile is never handed out twice.

use pd_core::{LocalPlane, TileIdx};
use pd_spatial::build_index;
use pd_tiles::{RawRow, TileFilter, TilesResult};

use crate::bbox::{padded_extent, resolve_centers};
use crate::{
    AssignConfig, AssignOutcome, AssignPass, AssignResult, AssignStatus, Assignment, PassStats,
    RoadSegment,
};

/// Best pass-1 proposal seen so far for one tile.
#[derive(Copy, Clone)]
struct Claim {
    distance_m: f64,
    /// Position in the resolved-centre arrays (ascending with road index).
    center:     usize,
}

/// Distribute the population in `rows` over `roads`.
///
/// `rows` is consumed once, in order.  The input roads are not modified;
/// use [`AssignOutcome::apply_to`] to write the densities back.
///
/// Empty data (no resolvable road centre, no population row inside the
/// box) and already-annotated roads are reported through
/// [`AssignOutcome::status`] rather than as errors.
///
/// # Errors
///
/// - [`PdError::Config`](pd_core::PdError::Config) for an invalid `config`.
/// - Fatal population source errors (I/O) from the row stream.
pub fn assign_density<I>(
    roads:  &[RoadSegment],
    rows:   I,
    config: &AssignConfig,
) -> AssignResult<AssignOutcome>
where
    I: IntoIterator<Item = TilesResult<RawRow>>,
{
    config.validate()?;

    if roads.iter().any(RoadSegment::is_annotated) {
        log::warn!("road set already carries pop_density; leaving it unchanged");
        let existing = roads.iter().map(|r| r.pop_density.unwrap_or(0.0)).collect();
        return Ok(AssignOutcome::empty(
            AssignStatus::AlreadyAnnotated,
            existing,
            config.distance,
            config.distance_threshold_m,
        ));
    }

    let mut outcome = AssignOutcome::empty(
        AssignStatus::Completed,
        vec![0.0; roads.len()],
        config.distance,
        config.distance_threshold_m,
    );

    // ── Road centres and box ─────────────────────────────────────────────
    let centers = resolve_centers(roads);
    if !centers.missing.is_empty() {
        log::warn!(
            "{} of {} road segments have no resolvable centre and are excluded",
            centers.missing.len(),
            roads.len()
        );
    }
    outcome.roads_without_center = centers.missing.clone();

    if centers.is_empty() {
        log::warn!("no road segment has a resolvable centre; nothing to assign");
        outcome.status = AssignStatus::NoRoads;
        return Ok(outcome);
    }

    let bbox = padded_extent(&centers.points, config.tile_half_width_deg)?;
    log::info!("road bounding box (padded by {}°): {bbox}", config.tile_half_width_deg);
    outcome.bbox = Some(bbox);

    // ── Tiles ────────────────────────────────────────────────────────────
    let filtered = TileFilter::new(bbox)
        .assume_lat_sorted(config.assume_lat_sorted)
        .run(rows)?;
    outcome.filter_stats = filtered.stats;
    outcome.tiles = filtered.tiles;

    if outcome.tiles.is_empty() {
        log::warn!("no population rows inside the road bounding box; all densities are 0");
        outcome.status = AssignStatus::NoTiles;
        return Ok(outcome);
    }

    let model = config.distance.model_for(&bbox);
    let plane = LocalPlane::for_bbox(&bbox);
    let road_pts: Vec<[f64; 2]> = centers.points.iter().map(|&p| plane.project(p)).collect();
    let tile_pts: Vec<[f64; 2]> =
        outcome.tiles.tiles().iter().map(|t| plane.project(t.center)).collect();

    let mut stats = PassStats::default();
    let mut used = vec![false; outcome.tiles.len()];

    // ── Pass 1: road → nearest tile ──────────────────────────────────────
    let tile_index = build_index(config.index, tile_pts, road_pts.len());
    let hits = tile_index.nearest_all(&road_pts)?;

    let mut claims: Vec<Option<Claim>> = vec![None; outcome.tiles.len()];
    let mut proposals = vec![0u32; outcome.tiles.len()];
    for (q, t, _) in hits.iter() {
        let tile = &outcome.tiles.tiles()[t];
        let distance_m = model.distance_m(centers.points[q], tile.center);
        if config.too_far(distance_m) {
            stats.pass1_too_far += 1;
            continue;
        }
        proposals[t] += 1;
        let proposal = Claim { distance_m, center: q };
        match claims[t] {
            None => claims[t] = Some(proposal),
            Some(best) => {
                stats.pass1_conflicts += 1;
                let wins = distance_m < best.distance_m
                    || (distance_m == best.distance_m && q < best.center);
                if wins {
                    claims[t] = Some(proposal);
                }
            }
        }
    }

    for (t, claim) in claims.iter().enumerate() {
        let Some(claim) = claim else { continue };
        used[t] = true;
        stats.tiles_used_pass1 += 1;
        outcome.assignments.push(Assignment {
            tile:       TileIdx(t as u32),
            road:       centers.road_idx[claim.center],
            distance_m: claim.distance_m,
            pop:        outcome.tiles.tiles()[t].pop,
            pass:       AssignPass::RoadToTile,
        });
    }
    log::info!(
        "pass 1 ({}): {} tiles claimed by {} roads ({} proposals too far, {} conflicts)",
        tile_index.name(),
        stats.tiles_used_pass1,
        road_pts.len(),
        stats.pass1_too_far,
        stats.pass1_conflicts
    );

    // ── Pass 2: leftover tile → nearest road ─────────────────────────────
    let leftover: Vec<usize> = (0..used.len()).filter(|&t| !used[t]).collect();
    if !leftover.is_empty() {
        let queries: Vec<[f64; 2]> = leftover
            .iter()
            .map(|&t| plane.project(outcome.tiles.tiles()[t].center))
            .collect();
        let road_index = build_index(config.index, road_pts, queries.len());
        let hits = road_index.nearest_all(&queries)?;

        for (q, r, _) in hits.iter() {
            let t = leftover[q];
            let tile = &outcome.tiles.tiles()[t];
            let distance_m = model.distance_m(tile.center, centers.points[r]);
            if config.too_far(distance_m) {
                stats.tiles_too_far += 1;
                continue;
            }
            stats.tiles_used_pass2 += 1;
            outcome.assignments.push(Assignment {
                tile: TileIdx(t as u32),
                road: centers.road_idx[r],
                distance_m,
                pop: tile.pop,
                pass: AssignPass::TileToRoad,
            });
        }
        log::info!(
            "pass 2 ({}): {} of {} leftover tiles assigned, {} beyond threshold",
            road_index.name(),
            stats.tiles_used_pass2,
            leftover.len(),
            stats.tiles_too_far
        );
    }

    for a in &outcome.assignments {
        outcome.road_density[a.road.index()] += a.pop;
    }
    outcome.tile_proposals = proposals;
    outcome.stats = stats;

    log::info!(
        "assigned {:.1} of {:.1} population over {} of {} tiles to {} roads",
        outcome.total_assigned(),
        outcome.tiles.total_pop(),
        stats.tiles_used_pass1 + stats.tiles_used_pass2,
        outcome.tiles.len(),
        roads.len()
    );
    Ok(outcome)
}
