use std::collections::HashMap;

use bevy::prelude::*;
use maf_layout::prelude::{LayoutEvent, ObjectKey, VisualKind, VisualObject};

use crate::events::LayoutMessage;

/// Map from object key to the entity mirroring it.
#[derive(Resource, Default)]
pub struct LayoutEntities(
    /// Live entities by key.
    pub HashMap<ObjectKey, Entity>,
);

impl LayoutEntities {
    pub fn get(&self, key: &ObjectKey) -> Option<Entity> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Component added to each entity mirroring a scene object.
///
/// The entity's [`Transform`] uses the session's world space: local metres, `z` up.
#[derive(Component, Debug, Clone)]
pub struct LayoutObject {
    pub key: ObjectKey,
    pub kind: VisualKind,
    /// Extent along the local x and y axes.
    pub footprint: Vec2,
    pub height: f32,
    /// `0xRRGGBB` colour hint.
    pub color: u32,
}

impl LayoutObject {
    /// Colour hint as a Bevy [`Color`].
    pub fn bevy_color(&self) -> Color {
        let [_, r, g, b] = self.color.to_be_bytes();
        Color::srgb_u8(r, g, b)
    }
}

/// [`EntityEvent`] emitted when an entity is spawned for a scene object.
///
/// Observe it to attach meshes or scenes; the plugin itself only spawns transforms.
#[derive(EntityEvent, Debug, Clone)]
pub struct LayoutObjectSpawned {
    pub entity: Entity,
    pub object: VisualObject,
}

/// Equipment entities carry the registered model scale.
pub(crate) fn object_transform(object: &VisualObject) -> Transform {
    let scale = match object.kind {
        VisualKind::Equipment { scale, .. } => scale,
        _ => 1.0,
    };
    Transform::from_translation(object.translation)
        .with_rotation(Quat::from_rotation_z(object.rotation))
        .with_scale(Vec3::splat(scale))
}

/// Spawns and despawns entities as objects enter and leave the scene.
pub(crate) fn sync_layout_entities(
    mut commands: Commands,
    mut messages: MessageReader<LayoutMessage>,
    mut entities: ResMut<LayoutEntities>,
) {
    let mut spawned = Vec::new();
    for message in messages.read() {
        match &message.event {
            LayoutEvent::ObjectAdded { object } => {
                if let Some(old) = entities.0.remove(&object.key) {
                    commands.entity(old).despawn();
                }
                let entity = commands
                    .spawn((
                        LayoutObject {
                            key: object.key.clone(),
                            kind: object.kind.clone(),
                            footprint: object.footprint,
                            height: object.height,
                            color: object.color,
                        },
                        object_transform(object),
                    ))
                    .id();
                entities.0.insert(object.key.clone(), entity);
                spawned.push(LayoutObjectSpawned {
                    entity,
                    object: object.clone(),
                });
            }
            LayoutEvent::ObjectRemoved { key } => {
                if let Some(entity) = entities.0.remove(key) {
                    commands.entity(entity).despawn();
                }
            }
            _ => {}
        }
    }

    for event in spawned {
        commands.trigger(event);
    }
}
