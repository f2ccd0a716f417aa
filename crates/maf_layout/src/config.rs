//! Session configuration.
use std::time::Duration;

use crate::error::{Error, Result};
use crate::paint::painter::{DEFAULT_MAX_RADIUS, RADIUS_LIMIT};
use crate::scene::SceneStyle;

/// Tunables of a [`crate::session::LayoutSession`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Quiet interval of both debounced requests.
    pub debounce: Duration,
    /// Tile edge length in local metres.
    pub cell_size: f64,
    /// Brush radius is clamped to `0..=max_brush_radius`.
    pub max_brush_radius: u32,
    /// Edge length of painted-tile markers.
    pub marker_size: f32,
    /// Height above ground of painted-tile markers.
    pub marker_elevation: f32,
    /// Amount subtracted from a slot's size to get its placeholder footprint.
    pub placeholder_inset: f32,
    /// Height of slot placeholders.
    pub placeholder_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let style = SceneStyle::default();
        Self {
            debounce: Duration::from_millis(250),
            cell_size: 1.0,
            max_brush_radius: DEFAULT_MAX_RADIUS,
            marker_size: style.marker_size,
            marker_elevation: style.marker_elevation,
            placeholder_inset: style.placeholder_inset,
            placeholder_height: style.placeholder_height,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_max_brush_radius(mut self, max_brush_radius: u32) -> Self {
        self.max_brush_radius = max_brush_radius;
        self
    }

    /// Sets marker edge length and elevation.
    pub fn with_marker(mut self, size: f32, elevation: f32) -> Self {
        self.marker_size = size;
        self.marker_elevation = elevation;
        self
    }

    /// Sets placeholder inset and height.
    pub fn with_placeholder(mut self, inset: f32, height: f32) -> Self {
        self.placeholder_inset = inset;
        self.placeholder_height = height;
        self
    }

    /// Object dimensions handed to the scene synchronizer.
    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            marker_size: self.marker_size,
            marker_elevation: self.marker_elevation,
            placeholder_inset: self.placeholder_inset,
            placeholder_height: self.placeholder_height,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size > 0.0) {
            return Err(Error::InvalidConfig("cell_size must be > 0".into()));
        }
        if self.max_brush_radius > RADIUS_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_brush_radius must be <= {RADIUS_LIMIT}"
            )));
        }
        if !(self.marker_size > 0.0) {
            return Err(Error::InvalidConfig("marker_size must be > 0".into()));
        }
        if !(self.placeholder_height > 0.0) {
            return Err(Error::InvalidConfig(
                "placeholder_height must be > 0".into(),
            ));
        }
        if !(self.placeholder_inset >= 0.0) {
            return Err(Error::InvalidConfig(
                "placeholder_inset must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
