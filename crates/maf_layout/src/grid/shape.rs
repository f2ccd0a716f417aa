//! Rasterization of a site boundary into tile space.
//!
//! [`ShapeRasterizer`] converts each boundary vertex to a tile through a
//! [`CoordinateFrame`], producing [`BoundaryTiles`] (the ring used for containment tests
//! while painting) and the [`TileBounds`] that size the [`ZoneMatrix`].
//!
//! Polygons are not validated: rings with fewer than three vertices or self
//! intersections produce degenerate, possibly empty, results.
use glam::DVec2;
use tracing::debug;

use super::frame::CoordinateFrame;
use super::geo::GeoCoord;
use super::matrix::ZoneMatrix;
use super::tile::TileCoord;

/// Boundary ring expressed in tile coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryTiles(Vec<TileCoord>);

impl BoundaryTiles {
    pub fn new(tiles: Vec<TileCoord>) -> Self {
        Self(tiles)
    }

    pub fn as_slice(&self) -> &[TileCoord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> {
        self.0.iter()
    }

    /// Even-odd containment of a continuous tile-space point.
    ///
    /// Rings with fewer than three vertices contain nothing.
    pub fn contains_point(&self, p: DVec2) -> bool {
        let ring = &self.0;
        if ring.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (xi, yi) = (ring[i].x as f64, ring[i].y as f64);
            let (xj, yj) = (ring[j].x as f64, ring[j].y as f64);
            if (yi > p.y) != (yj > p.y) && p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Whether the centre of `tile` lies inside the ring.
    #[inline]
    pub fn contains_tile(&self, tile: TileCoord) -> bool {
        self.contains_point(tile.center())
    }
}

impl From<Vec<TileCoord>> for BoundaryTiles {
    fn from(value: Vec<TileCoord>) -> Self {
        Self(value)
    }
}

/// Largest tile coordinates observed on the boundary, floored at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileBounds {
    pub max_x: u32,
    pub max_y: u32,
}

impl TileBounds {
    /// Number of matrix columns.
    pub fn width(&self) -> usize {
        self.max_x as usize
    }

    /// Number of matrix rows.
    pub fn height(&self) -> usize {
        self.max_y as usize
    }
}

/// Output of [`ShapeRasterizer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterizedShape {
    pub boundary: BoundaryTiles,
    pub bounds: TileBounds,
}

impl RasterizedShape {
    /// A fresh, all-unassigned matrix of `bounds.max_y` rows by `bounds.max_x` columns.
    pub fn zone_matrix(&self) -> ZoneMatrix {
        ZoneMatrix::new(self.bounds.width(), self.bounds.height())
    }
}

pub struct ShapeRasterizer;

impl ShapeRasterizer {
    /// Rasterizes a geographic boundary ring.
    pub fn rasterize(frame: &CoordinateFrame, ring: &[GeoCoord]) -> RasterizedShape {
        let tiles = ring.iter().map(|g| frame.geo_to_tile(*g)).collect();
        Self::from_tiles(tiles)
    }

    /// Rasterizes a boundary ring already expressed in the frame's local metres.
    pub fn rasterize_local(frame: &CoordinateFrame, ring: &[DVec2]) -> RasterizedShape {
        let tiles = ring.iter().map(|p| frame.to_tile(*p)).collect();
        Self::from_tiles(tiles)
    }

    fn from_tiles(tiles: Vec<TileCoord>) -> RasterizedShape {
        let mut bounds = TileBounds::default();
        for t in &tiles {
            bounds.max_x = bounds.max_x.max(t.x.max(0) as u32);
            bounds.max_y = bounds.max_y.max(t.y.max(0) as u32);
        }
        if tiles.len() < 3 || bounds.max_x == 0 || bounds.max_y == 0 {
            debug!(
                "Degenerate boundary: {} vertices, bounds {}x{}.",
                tiles.len(),
                bounds.max_x,
                bounds.max_y
            );
        }
        RasterizedShape {
            boundary: BoundaryTiles(tiles),
            bounds,
        }
    }
}
