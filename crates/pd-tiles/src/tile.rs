//! Population tiles keyed by raw coordinate text.

use std::fmt;

use pd_core::{GeoPoint, TileIdx};

#[cfg(feature = "fx-hash")]
type KeyMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type KeyMap<K, V> = std::collections::HashMap<K, V>;

/// Tile identity: the trimmed lon/lat text exactly as it appeared in the
/// source row.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileKey {
    pub lon: String,
    pub lat: String,
}

impl TileKey {
    pub fn new(lon: impl Into<String>, lat: impl Into<String>) -> Self {
        Self { lon: lon.into(), lat: lat.into() }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// One grid cell inside the bounding box.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationTile {
    pub key:    TileKey,
    /// Parsed centre of the first source row seen for `key`.
    pub center: GeoPoint,
    /// Sum of the population of every source row sharing `key`.
    pub pop:    f64,
}

/// Tiles in first-seen order, addressable by [`TileIdx`] or [`TileKey`].
///
/// Insertion order follows the source, so every downstream decision that
/// depends on tile order (tie-breaks, pass-2 query order) is deterministic
/// for a fixed input file.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    tiles:  Vec<PopulationTile>,
    by_key: KeyMap<TileKey, TileIdx>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Add `value` to the tile for `key`, creating it at `center` if new.
    ///
    /// Returns `true` when a new tile was created, `false` when the value was
    /// merged into an existing one.
    pub fn accumulate(&mut self, key: TileKey, center: GeoPoint, value: f64) -> bool {
        if let Some(idx) = self.lookup(&key) {
            self.tiles[idx.index()].pop += value;
            return false;
        }
        let idx = TileIdx(self.tiles.len() as u32);
        self.by_key.insert(key.clone(), idx);
        self.tiles.push(PopulationTile { key, center, pop: value });
        true
    }

    #[inline]
    pub fn get(&self, idx: TileIdx) -> &PopulationTile {
        &self.tiles[idx.index()]
    }

    pub fn lookup(&self, key: &TileKey) -> Option<TileIdx> {
        self.by_key.get(key).copied()
    }

    pub fn tiles(&self) -> &[PopulationTile] {
        &self.tiles
    }

    /// Total population of every tile in the set.
    pub fn total_pop(&self) -> f64 {
        self.tiles.iter().map(|t| t.pop).sum()
    }
}
