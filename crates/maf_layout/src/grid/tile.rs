//! Integer tile coordinates of the local grid.
use std::fmt;
use std::ops::{Add, Sub};

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell of the site grid. `x` runs along the frame's x axis, `y` along its y axis.
///
/// Serialized as `[x, y]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[i32; 2]", into = "[i32; 2]"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const ZERO: TileCoord = TileCoord::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile shifted by `(dx, dy)`, saturating at the `i32` range.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Centre of the tile in continuous tile space.
    #[inline]
    pub fn center(self) -> DVec2 {
        DVec2::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl Add for TileCoord {
    type Output = TileCoord;

    fn add(self, rhs: TileCoord) -> TileCoord {
        TileCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for TileCoord {
    type Output = TileCoord;

    fn sub(self, rhs: TileCoord) -> TileCoord {
        TileCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[i32; 2]> for TileCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<TileCoord> for [i32; 2] {
    fn from(value: TileCoord) -> Self {
        [value.x, value.y]
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_key_format() {
        assert_eq!(TileCoord::new(3, -4).to_string(), "3,-4");
    }

    #[test]
    fn offset_and_arithmetic_agree() {
        let t = TileCoord::new(2, 3);
        assert_eq!(t.offset(-1, 1), t + TileCoord::new(-1, 1));
        assert_eq!(t - t, TileCoord::ZERO);
    }

    #[test]
    fn offset_saturates_at_range_ends() {
        let far = TileCoord::new(i32::MAX, i32::MIN);
        assert_eq!(far.offset(1, -1), far);
        assert_eq!(far.offset(-1, 1), TileCoord::new(i32::MAX - 1, i32::MIN + 1));
    }

    #[test]
    fn center_is_half_a_tile_in() {
        assert_eq!(TileCoord::new(-1, 2).center(), DVec2::new(-0.5, 2.5));
    }
}
