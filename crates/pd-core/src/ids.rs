//! Identifier types.
//!
//! `RoadIdx` and `TileIdx` are dense positional indices into the engine's
//! road and tile arrays.  They are `Copy + Ord + Hash` so they can be used as
//! map keys and sorted without ceremony.  `SegmentId` is the opaque id handed
//! out by the street-network provider and is only carried through to output.

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Position of a road segment in the engine's input slice.
    pub struct RoadIdx(u32);
}

typed_id! {
    /// Position of a population tile in a `TileSet` (insertion order).
    pub struct TileIdx(u32);
}

/// Opaque road-segment identifier as assigned by the street-network provider.
///
/// OSM line-graph nodes are `(u, v, key)` triples, other providers use plain
/// integers; a string covers both without the engine caring.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SegmentId(pub String);

impl SegmentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SegmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SegmentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
