//! CSV road loader.
//!
//! Stands in for the street-network provider.  Expected columns:
//!
//! | Column        | Content                                              |
//! |---------------|------------------------------------------------------|
//! | `id`          | opaque segment id                                    |
//! | `lon`, `lat`  | explicit centre, may be empty                        |
//! | `geometry`    | `LINESTRING (x y, x y, …)` in WKT, may be empty       |
//! | `pop_density` | optional; a value marks the road as already annotated |
//!
//! Unlike population rows, malformed road records are errors: the provider
//! owns its data quality and a silently dropped road would skew densities.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

use pd_core::GeoPoint;

use crate::{AssignError, AssignResult, RoadSegment};

#[derive(Debug, Deserialize)]
struct RoadRecord {
    id:          String,
    #[serde(default)]
    lon:         Option<f64>,
    #[serde(default)]
    lat:         Option<f64>,
    #[serde(default)]
    geometry:    Option<String>,
    #[serde(default)]
    pop_density: Option<f64>,
}

impl RoadRecord {
    fn into_segment(self) -> AssignResult<RoadSegment> {
        let geometry = match self.geometry.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(wkt) => Some(parse_linestring(wkt).map_err(|msg| AssignError::RoadParse {
                id: self.id.clone(),
                msg,
            })?),
        };
        let coord = match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)),
            _ => None,
        };
        Ok(RoadSegment { id: self.id.into(), geometry, coord, pop_density: self.pop_density })
    }
}

/// Load road segments from a CSV file.
///
/// # Errors
///
/// [`AssignError::RoadSourceNotFound`] if the file does not exist, otherwise
/// any error from [`load_roads_reader`].
pub fn load_roads_csv(path: &Path) -> AssignResult<Vec<RoadSegment>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssignError::RoadSourceNotFound(path.to_path_buf()),
        _ => AssignError::RoadCsv(e.into()),
    })?;
    let roads = load_roads_reader(file)?;
    log::info!("loaded {} road segments from {}", roads.len(), path.display());
    Ok(roads)
}

/// Load road segments from any reader (header row required).
pub fn load_roads_reader<R: Read>(reader: R) -> AssignResult<Vec<RoadSegment>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    rdr.deserialize::<RoadRecord>()
        .map(|rec| rec.map_err(AssignError::from).and_then(RoadRecord::into_segment))
        .collect()
}

/// Parse `LINESTRING (x y, x y, …)`; the keyword is case-insensitive.
fn parse_linestring(wkt: &str) -> Result<Vec<GeoPoint>, String> {
    let (tag, rest) = wkt
        .split_once('(')
        .ok_or_else(|| format!("expected WKT LINESTRING, got {wkt:?}"))?;
    if !tag.trim().eq_ignore_ascii_case("LINESTRING") {
        return Err(format!("unsupported geometry type {:?}", tag.trim()));
    }
    let body = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| "unterminated LINESTRING".to_string())?;

    body.split(',')
        .map(|pair| {
            let mut it = pair.split_whitespace();
            match (it.next(), it.next(), it.next()) {
                (Some(x), Some(y), None) => {
                    let lon = x.parse::<f64>().map_err(|e| format!("bad x {x:?}: {e}"))?;
                    let lat = y.parse::<f64>().map_err(|e| format!("bad y {y:?}: {e}"))?;
                    Ok(GeoPoint::new(lon, lat))
                }
                _ => Err(format!("bad coordinate pair {:?}", pair.trim())),
            }
        })
        .collect()
}
