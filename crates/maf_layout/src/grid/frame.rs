//! Rotation-aligned local frame anchored on a site boundary.
//!
//! A [`CoordinateFrame`] converts geographic coordinates into local metres centred on the
//! first boundary vertex, and local metres into integer tiles along two orthogonal axes
//! derived from the first boundary edge. A rectangular site therefore maps onto an
//! axis-aligned tile rectangle whatever its compass bearing.
use glam::{DVec2, Vec3};
use tracing::debug;

use super::geo::{from_mercator, meters_per_mercator_unit, to_mercator, GeoCoord};
use super::tile::TileCoord;

/// Projections closer than this (in tiles) below a grid line are snapped onto it, so
/// vertices that sit on a grid line survive the round trip through geographic space.
const SNAP_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateFrame {
    origin: GeoCoord,
    origin_mercator: DVec2,
    meters_per_unit: f64,
    x_axis: DVec2,
    y_axis: DVec2,
    rotation: f64,
    cell_size: f64,
}

impl CoordinateFrame {
    /// Creates an east/north aligned frame centred on `origin` with square tiles of
    /// `cell_size` metres.
    pub fn new(origin: GeoCoord, cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be > 0");
        Self {
            origin,
            origin_mercator: to_mercator(origin),
            meters_per_unit: meters_per_mercator_unit(origin.lat),
            x_axis: DVec2::X,
            y_axis: DVec2::Y,
            rotation: 0.0,
            cell_size,
        }
    }

    /// Anchors a frame on a boundary ring: origin at the first vertex, x axis along the
    /// first edge.
    ///
    /// Degenerate rings (empty, or all vertices coincident) yield an east/north aligned frame.
    pub fn setup(ring: &[GeoCoord], cell_size: f64) -> Self {
        let Some(&origin) = ring.first() else {
            debug!("Empty boundary ring; falling back to an unanchored frame.");
            return Self::new(GeoCoord::default(), cell_size);
        };
        let frame = Self::new(origin, cell_size);
        let local: Vec<DVec2> = ring.iter().map(|g| frame.to_local(*g)).collect();
        frame.aligned_to(&local)
    }

    /// Re-derives the basis from a ring given in this frame's local metres.
    ///
    /// The x axis follows the first non-degenerate edge. The y axis is the x axis rotated
    /// by +90° for counter-clockwise rings and by -90° for clockwise rings, which keeps the
    /// interior on the positive side of both axes regardless of winding.
    pub fn aligned_to(mut self, local_ring: &[DVec2]) -> Self {
        let Some(&first) = local_ring.first() else {
            return self;
        };
        let Some(edge) = local_ring
            .iter()
            .skip(1)
            .map(|p| *p - first)
            .find(|d| d.length_squared() > f64::EPSILON)
        else {
            debug!("Boundary ring has no usable edge; keeping east/north axes.");
            return self;
        };

        let x_axis = edge.normalize();
        let mut y_axis = x_axis.perp();
        if signed_area(local_ring) < 0.0 {
            y_axis = -y_axis;
        }

        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self.rotation = x_axis.y.atan2(x_axis.x);
        self
    }

    pub fn origin(&self) -> GeoCoord {
        self.origin
    }

    pub fn x_axis(&self) -> DVec2 {
        self.x_axis
    }

    pub fn y_axis(&self) -> DVec2 {
        self.y_axis
    }

    /// Angle in radians from local east to the frame's x axis.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Converts a geographic coordinate into local metres (`+x` east, `+y` north).
    pub fn to_local(&self, geo: GeoCoord) -> DVec2 {
        let d = to_mercator(geo) - self.origin_mercator;
        DVec2::new(d.x, -d.y) * self.meters_per_unit
    }

    /// Converts local metres back into a geographic coordinate.
    pub fn to_geo(&self, local: DVec2) -> GeoCoord {
        let d = DVec2::new(local.x, -local.y) / self.meters_per_unit;
        from_mercator(self.origin_mercator + d)
    }

    /// Continuous tile-space coordinates of a local point.
    pub fn to_tile_space(&self, local: DVec2) -> DVec2 {
        // The local frame is centred on the origin, so the dot products are already signed
        // relative to it.
        DVec2::new(local.dot(self.x_axis), local.dot(self.y_axis)) / self.cell_size
    }

    /// Tile containing a local point.
    pub fn to_tile(&self, local: DVec2) -> TileCoord {
        let p = self.to_tile_space(local);
        TileCoord::new(snap_floor(p.x), snap_floor(p.y))
    }

    /// Tile containing a geographic coordinate.
    pub fn geo_to_tile(&self, geo: GeoCoord) -> TileCoord {
        self.to_tile(self.to_local(geo))
    }

    /// Local position of a tile's centre.
    pub fn tile_to_local(&self, tile: TileCoord) -> DVec2 {
        self.tile_space_to_local(tile.center())
    }

    /// Local position of a continuous tile-space point.
    pub fn tile_space_to_local(&self, p: DVec2) -> DVec2 {
        (self.x_axis * p.x + self.y_axis * p.y) * self.cell_size
    }

    /// World-space translation (z up) for a local point lifted to `elevation`.
    pub fn to_world(&self, local: DVec2, elevation: f32) -> Vec3 {
        Vec3::new(local.x as f32, local.y as f32, elevation)
    }
}

#[inline]
fn snap_floor(v: f64) -> i32 {
    (v + SNAP_EPSILON).floor() as i32
}

/// Shoelace area, positive for counter-clockwise rings.
fn signed_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    acc * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: GeoCoord = GeoCoord::new(37.617698, 55.755864);

    fn rotated_rect(angle: f64, w: f64, h: f64) -> Vec<DVec2> {
        let x = DVec2::from_angle(angle);
        let y = x.perp();
        vec![DVec2::ZERO, x * w, x * w + y * h, y * h]
    }

    #[test]
    fn tile_roundtrip_is_exact_on_rotated_frame() {
        let frame = CoordinateFrame::new(MOSCOW, 1.0).aligned_to(&rotated_rect(0.37, 10.0, 6.0));
        for y in -20..20 {
            for x in -20..20 {
                let t = TileCoord::new(x, y);
                assert_eq!(frame.to_tile(frame.tile_to_local(t)), t);
            }
        }
    }

    #[test]
    fn tile_roundtrip_respects_cell_size() {
        let frame = CoordinateFrame::new(MOSCOW, 2.5).aligned_to(&rotated_rect(-1.2, 10.0, 6.0));
        for t in [
            TileCoord::new(0, 0),
            TileCoord::new(-3, 7),
            TileCoord::new(11, -2),
        ] {
            assert_eq!(frame.to_tile(frame.tile_to_local(t)), t);
        }
    }

    #[test]
    fn unit_square_keeps_east_north_axes() {
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let frame = CoordinateFrame::new(GeoCoord::default(), 1.0).aligned_to(&square);
        assert_eq!(frame.x_axis(), DVec2::X);
        assert_eq!(frame.y_axis(), DVec2::Y);
        assert_eq!(frame.rotation(), 0.0);
    }

    #[test]
    fn rotated_rectangle_maps_to_axis_aligned_tiles() {
        let ring = rotated_rect(0.52, 10.0, 6.0);
        let frame = CoordinateFrame::new(MOSCOW, 1.0).aligned_to(&ring);
        let tiles: Vec<TileCoord> = ring.iter().map(|p| frame.to_tile(*p)).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(10, 0),
                TileCoord::new(10, 6),
                TileCoord::new(0, 6),
            ]
        );
        assert!((frame.rotation() - 0.52).abs() < 1e-12);
    }

    #[test]
    fn clockwise_ring_flips_y_axis() {
        let mut ring = rotated_rect(0.0, 8.0, 4.0);
        ring.reverse();
        // Start the reversed ring at the origin again.
        ring.rotate_right(1);
        let frame = CoordinateFrame::new(MOSCOW, 1.0).aligned_to(&ring);
        assert_eq!(frame.x_axis(), DVec2::Y);
        assert_eq!(frame.y_axis(), DVec2::X);
        for p in &ring {
            let t = frame.to_tile(*p);
            assert!(t.x >= 0 && t.y >= 0, "tile {t} should be non-negative");
        }
    }

    #[test]
    fn setup_from_geographic_ring_aligns_to_first_edge() {
        let base = CoordinateFrame::new(MOSCOW, 1.0);
        let ring: Vec<GeoCoord> = rotated_rect(0.8, 20.0, 10.0)
            .into_iter()
            .map(|p| base.to_geo(p))
            .collect();

        let frame = CoordinateFrame::setup(&ring, 1.0);
        let tiles: Vec<TileCoord> = ring.iter().map(|g| frame.geo_to_tile(*g)).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(20, 0),
                TileCoord::new(20, 10),
                TileCoord::new(0, 10),
            ]
        );
        assert!((frame.rotation() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn local_and_geo_are_inverse() {
        let frame = CoordinateFrame::new(MOSCOW, 1.0);
        let p = DVec2::new(12.5, -40.25);
        let back = frame.to_local(frame.to_geo(p));
        assert!((back - p).length() < 1e-6);
        assert!(frame.to_local(MOSCOW).length() < 1e-9);
    }

    #[test]
    fn one_tile_is_about_one_metre() {
        let frame = CoordinateFrame::new(MOSCOW, 1.0);
        // ~111 km per degree of latitude.
        let north = GeoCoord::new(MOSCOW.lng, MOSCOW.lat + 0.001);
        let local = frame.to_local(north);
        assert!(local.x.abs() < 1e-6);
        assert!((local.y - 111.2).abs() < 1.0, "got {}", local.y);
    }

    #[test]
    fn degenerate_rings_keep_default_axes() {
        let empty = CoordinateFrame::setup(&[], 1.0);
        assert_eq!(empty.x_axis(), DVec2::X);

        let point = CoordinateFrame::setup(&[MOSCOW, MOSCOW], 1.0);
        assert_eq!(point.x_axis(), DVec2::X);
        assert_eq!(point.origin(), MOSCOW);
    }
}
