//! Zone painting with a square brush constrained to the site boundary.
pub mod brush;
pub mod painter;

pub use brush::Brush;
pub use painter::{BrushPainter, StampResult};
