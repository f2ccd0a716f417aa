//! Renderer-facing description of placed objects.
use glam::{DVec2, Vec2, Vec3};

use super::key::ObjectKey;
use super::models::ModelEntry;
use crate::grid::{CoordinateFrame, TileCoord, Zone};
use crate::paint::Brush;
use crate::service::Slot;

/// What the renderer should draw for an object.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualKind {
    /// Small cube over a painted tile.
    Marker,
    /// Flat box covering a slot.
    Placeholder,
    /// A registered equipment model, with its source and scale from the registry.
    Equipment {
        model: String,
        source: String,
        scale: f32,
    },
}

/// Dimensions used when turning tiles and slots into objects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    pub marker_size: f32,
    pub marker_elevation: f32,
    pub placeholder_inset: f32,
    pub placeholder_height: f32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            marker_size: 0.5,
            marker_elevation: 0.2,
            placeholder_inset: 0.3,
            placeholder_height: 0.1,
        }
    }
}

/// A rendered entity. World space is local metres with `z` up.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualObject {
    pub key: ObjectKey,
    pub kind: VisualKind,
    /// Centre of the object.
    pub translation: Vec3,
    /// Extent along the frame's x and y axes.
    pub footprint: Vec2,
    pub height: f32,
    /// Rotation about `z` in radians.
    pub rotation: f32,
    /// `0xRRGGBB` colour hint.
    pub color: u32,
}

impl VisualObject {
    pub fn marker(
        frame: &CoordinateFrame,
        style: &SceneStyle,
        brush: Brush,
        tile: TileCoord,
    ) -> Self {
        let local = frame.tile_to_local(tile);
        Self {
            key: ObjectKey::marker(brush, tile),
            kind: VisualKind::Marker,
            translation: frame.to_world(local, style.marker_elevation),
            footprint: Vec2::splat(style.marker_size),
            height: style.marker_size,
            rotation: frame.rotation() as f32,
            color: brush.zone().color(),
        }
    }

    pub fn placeholder(frame: &CoordinateFrame, style: &SceneStyle, slot: &Slot) -> Self {
        let size = slot_size(slot);
        let footprint = (size - Vec2::splat(style.placeholder_inset)).max(Vec2::ZERO);
        Self {
            key: ObjectKey::placeholder(slot),
            kind: VisualKind::Placeholder,
            translation: frame.to_world(slot_center(frame, slot), style.placeholder_height / 2.0),
            footprint,
            height: style.placeholder_height,
            rotation: frame.rotation() as f32,
            color: slot.zone.color(),
        }
    }

    /// Equipment object for a slot drawn with `entry`, or `None` if the slot has no equipment.
    pub fn equipment(frame: &CoordinateFrame, slot: &Slot, entry: &ModelEntry) -> Option<Self> {
        let item = slot.equipment.as_ref()?;
        let key = ObjectKey::equipment(slot)?;
        Some(Self {
            key,
            kind: VisualKind::Equipment {
                model: item.model.clone(),
                source: entry.source.clone(),
                scale: entry.scale,
            },
            translation: frame.to_world(slot_center(frame, slot), 0.0),
            footprint: slot_size(slot),
            height: 0.0,
            rotation: frame.rotation() as f32 + slot.equipment_rotation,
            color: slot.zone.color(),
        })
    }

    pub fn zone(&self) -> Option<Zone> {
        match &self.key {
            ObjectKey::Marker { brush, .. } => Some(brush.zone()),
            ObjectKey::Placeholder { zone, .. } => Some(*zone),
            ObjectKey::Equipment { .. } => None,
        }
    }
}

fn slot_size(slot: &Slot) -> Vec2 {
    Vec2::new(slot.size[0] as f32, slot.size[1] as f32)
}

/// Local position of the centre of a slot rectangle.
fn slot_center(frame: &CoordinateFrame, slot: &Slot) -> DVec2 {
    let p = DVec2::new(
        slot.position.x as f64 + slot.size[0] as f64 / 2.0,
        slot.position.y as f64 + slot.size[1] as f64 / 2.0,
    );
    frame.tile_space_to_local(p)
}
