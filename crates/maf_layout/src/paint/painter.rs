//! Brush state and stamping.
//!
//! A stamp covers the square `[-radius, radius]²` around the centre tile (radius 0 is a
//! single tile, radius 1 a 3×3 block). Each covered tile is written only if it lies inside
//! the matrix, its centre lies inside the boundary ring, and it does not already hold the
//! requested zone.
use crate::grid::{BoundaryTiles, TileCoord, Zone, ZoneMatrix};

use super::brush::Brush;

pub const DEFAULT_MAX_RADIUS: u32 = 3;

/// Largest radius a painter accepts. Larger limits are clamped to it.
pub const RADIUS_LIMIT: u32 = 64;

/// Outcome of a single stamp.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StampResult {
    /// Tiles whose zone actually changed, in row-major stamp order.
    pub changed: Vec<TileCoord>,
    /// Covered tiles outside the matrix.
    pub outside_matrix: usize,
    /// Covered tiles whose centre is outside the boundary.
    pub outside_boundary: usize,
    /// Covered tiles that already held the zone.
    pub unchanged: usize,
}

impl StampResult {
    /// `true` when nothing was written, so no recomputation is needed.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Brush selection, radius, cursor and stroke state of the pointer.
#[derive(Clone, Debug)]
pub struct BrushPainter {
    brush: Option<Brush>,
    radius: u32,
    max_radius: u32,
    cursor: Option<TileCoord>,
    stroke_active: bool,
}

impl Default for BrushPainter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RADIUS)
    }
}

impl BrushPainter {
    /// Creates a painter with no brush selected and radius 1.
    ///
    /// `max_radius` is clamped to [`RADIUS_LIMIT`].
    pub fn new(max_radius: u32) -> Self {
        let max_radius = max_radius.min(RADIUS_LIMIT);
        Self {
            brush: None,
            radius: 1.min(max_radius),
            max_radius,
            cursor: None,
            stroke_active: false,
        }
    }

    pub fn brush(&self) -> Option<Brush> {
        self.brush
    }

    /// Selects a brush; `None` leaves painting mode and ends any stroke.
    pub fn set_brush(&mut self, brush: Option<Brush>) {
        self.brush = brush;
        if brush.is_none() {
            self.stroke_active = false;
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn max_radius(&self) -> u32 {
        self.max_radius
    }

    /// Sets the radius, clamped to `0..=max_radius`. Returns the applied value.
    pub fn set_radius(&mut self, radius: u32) -> u32 {
        self.radius = radius.min(self.max_radius);
        self.radius
    }

    /// Edge length of the stamped square in tiles.
    pub fn extent(&self) -> u32 {
        self.radius.saturating_mul(2).saturating_add(1)
    }

    pub fn cursor(&self) -> Option<TileCoord> {
        self.cursor
    }

    pub fn set_cursor(&mut self, tile: TileCoord) {
        self.cursor = Some(tile);
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke_active
    }

    pub fn begin_stroke(&mut self) {
        self.stroke_active = true;
    }

    pub fn end_stroke(&mut self) {
        self.stroke_active = false;
    }

    /// Forgets cursor and stroke, keeping brush and radius.
    pub fn reset_pointer(&mut self) {
        self.cursor = None;
        self.stroke_active = false;
    }

    /// Stamps the selected brush at the cursor. `None` without a brush or cursor.
    pub fn stamp(&self, matrix: &mut ZoneMatrix, boundary: &BoundaryTiles) -> Option<StampResult> {
        let brush = self.brush?;
        let center = self.cursor?;
        Some(Self::paint(matrix, boundary, center, self.radius, brush.zone()))
    }

    /// Writes `zone` into every eligible tile of the square around `center`.
    ///
    /// `radius` is clamped to [`RADIUS_LIMIT`].
    pub fn paint(
        matrix: &mut ZoneMatrix,
        boundary: &BoundaryTiles,
        center: TileCoord,
        radius: u32,
        zone: Zone,
    ) -> StampResult {
        let r = i32::try_from(radius.min(RADIUS_LIMIT)).unwrap_or(0);
        let mut result = StampResult::default();

        for oy in -r..=r {
            for ox in -r..=r {
                let tile = center.offset(ox, oy);
                let Some(current) = matrix.get(tile) else {
                    result.outside_matrix += 1;
                    continue;
                };
                if !boundary.contains_tile(tile) {
                    result.outside_boundary += 1;
                    continue;
                }
                if current == zone {
                    result.unchanged += 1;
                    continue;
                }
                matrix.set(tile, zone);
                result.changed.push(tile);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(n: i32) -> BoundaryTiles {
        BoundaryTiles::new(vec![
            TileCoord::new(0, 0),
            TileCoord::new(n, 0),
            TileCoord::new(n, n),
            TileCoord::new(0, n),
        ])
    }

    #[test]
    fn radius_zero_paints_single_tile() {
        let mut m = ZoneMatrix::new(6, 6);
        let r = BrushPainter::paint(&mut m, &square(6), TileCoord::new(2, 3), 0, Zone::Sport);
        assert_eq!(r.changed, vec![TileCoord::new(2, 3)]);
        assert_eq!(m.to_rows()[3][2], 1);
        assert_eq!(m.count(Zone::Sport), 1);
    }

    #[test]
    fn radius_one_is_a_square() {
        let mut m = ZoneMatrix::new(6, 6);
        let r = BrushPainter::paint(&mut m, &square(6), TileCoord::new(2, 2), 1, Zone::Relax);
        assert_eq!(r.changed.len(), 9);
        // Corners of the 3x3 block are painted too.
        assert_eq!(m.get(TileCoord::new(1, 1)), Some(Zone::Relax));
        assert_eq!(m.get(TileCoord::new(3, 3)), Some(Zone::Relax));
        assert_eq!(m.get(TileCoord::new(4, 4)), Some(Zone::Unassigned));
    }

    #[test]
    fn repainting_same_zone_is_noop() {
        let mut m = ZoneMatrix::new(4, 4);
        let b = square(4);
        BrushPainter::paint(&mut m, &b, TileCoord::new(1, 1), 1, Zone::Child);
        let again = BrushPainter::paint(&mut m, &b, TileCoord::new(1, 1), 1, Zone::Child);
        assert!(again.is_noop());
        assert_eq!(again.unchanged, 9);
    }

    #[test]
    fn never_writes_outside_matrix_or_boundary() {
        // Triangle occupying the lower-left half of a 4x4 matrix.
        let triangle = BoundaryTiles::new(vec![
            TileCoord::new(0, 0),
            TileCoord::new(4, 0),
            TileCoord::new(0, 4),
        ]);
        let mut m = ZoneMatrix::new(4, 4);
        let r = BrushPainter::paint(&mut m, &triangle, TileCoord::new(3, 3), 2, Zone::Sport);
        assert!(r.outside_matrix > 0);
        assert!(r.outside_boundary > 0);
        for (tile, zone) in m.iter() {
            if zone.is_assigned() {
                assert!(triangle.contains_tile(tile), "painted {tile} outside the ring");
            }
        }

        let before = m.clone();
        let r = BrushPainter::paint(&mut m, &triangle, TileCoord::new(10, 10), 1, Zone::Sport);
        assert!(r.is_noop());
        assert_eq!(r.outside_matrix, 9);
        assert_eq!(m, before);
    }

    #[test]
    fn erase_writes_unassigned() {
        let mut m = ZoneMatrix::new(3, 3);
        let b = square(3);
        BrushPainter::paint(&mut m, &b, TileCoord::new(1, 1), 1, Zone::Sport);
        let r = BrushPainter::paint(&mut m, &b, TileCoord::new(1, 1), 0, Brush::Erase.zone());
        assert_eq!(r.changed, vec![TileCoord::new(1, 1)]);
        assert_eq!(m.count(Zone::Sport), 8);
    }

    #[test]
    fn stamp_requires_brush_and_cursor() {
        let mut m = ZoneMatrix::new(3, 3);
        let b = square(3);
        let mut painter = BrushPainter::default();
        assert!(painter.stamp(&mut m, &b).is_none());
        painter.set_cursor(TileCoord::new(1, 1));
        assert!(painter.stamp(&mut m, &b).is_none());
        painter.set_brush(Some(Brush::Child));
        let r = painter.stamp(&mut m, &b).expect("brush and cursor set");
        assert_eq!(r.changed.len(), 9);
    }

    #[test]
    fn radius_is_clamped() {
        let mut painter = BrushPainter::new(3);
        assert_eq!(painter.set_radius(7), 3);
        assert_eq!(painter.extent(), 7);
        assert_eq!(painter.set_radius(0), 0);
        assert_eq!(painter.extent(), 1);
    }

    #[test]
    fn oversized_radius_is_capped() {
        let mut painter = BrushPainter::new(u32::MAX);
        assert_eq!(painter.max_radius(), RADIUS_LIMIT);
        assert_eq!(painter.set_radius(u32::MAX), RADIUS_LIMIT);
        assert_eq!(painter.extent(), 2 * RADIUS_LIMIT + 1);

        let mut m = ZoneMatrix::new(8, 8);
        let center = TileCoord::new(2, 2);
        let r = BrushPainter::paint(&mut m, &square(8), center, u32::MAX, Zone::Sport);
        assert_eq!(r.changed.len(), 64);
        assert_eq!(m.count(Zone::Sport), 64);
    }

    #[test]
    fn clearing_brush_ends_stroke() {
        let mut painter = BrushPainter::default();
        painter.set_brush(Some(Brush::Sport));
        painter.begin_stroke();
        painter.set_brush(None);
        assert!(!painter.is_stroke_active());
    }
}
