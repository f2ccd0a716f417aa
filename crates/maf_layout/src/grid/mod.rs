//! Site-relative tile grid.
//!
//! This module groups the pieces that turn a geographic site boundary into an integer
//! tile grid: projection of geographic coordinates into local metres ([`geo`]), the
//! rotation-aligned [`CoordinateFrame`], boundary rasterization ([`ShapeRasterizer`]) and
//! the mutable [`ZoneMatrix`] painted by the brush.
pub mod frame;
pub mod geo;
pub mod matrix;
pub mod shape;
pub mod tile;
pub mod zone;

pub use frame::CoordinateFrame;
pub use geo::GeoCoord;
pub use matrix::ZoneMatrix;
pub use shape::{BoundaryTiles, RasterizedShape, ShapeRasterizer, TileBounds};
pub use tile::TileCoord;
pub use zone::Zone;
