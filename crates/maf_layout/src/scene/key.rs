//! Stable object keys.
use std::fmt;

use crate::grid::{TileCoord, Zone};
use crate::paint::Brush;
use crate::service::Slot;

/// Identity of a visual object across synchronization passes.
///
/// Built only from semantic attributes, so the same slot in two successive results yields
/// the same key. The [`fmt::Display`] form is the textual key handed to renderers:
///
/// | variant       | text             |
/// |---------------|------------------|
/// | `Marker`      | `sport:3,4`      |
/// | `Placeholder` | `child:2,0:3x2`  |
/// | `Equipment`   | `swing-01:2,0:3x2` |
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKey {
    /// A tile touched by a brush stamp.
    Marker { brush: Brush, tile: TileCoord },
    /// The footprint of a computed slot.
    Placeholder {
        zone: Zone,
        position: TileCoord,
        size: [u32; 2],
    },
    /// An equipment model placed in a slot.
    Equipment {
        equipment: String,
        position: TileCoord,
        size: [u32; 2],
    },
}

impl ObjectKey {
    pub fn marker(brush: Brush, tile: TileCoord) -> Self {
        ObjectKey::Marker { brush, tile }
    }

    pub fn placeholder(slot: &Slot) -> Self {
        ObjectKey::Placeholder {
            zone: slot.zone,
            position: slot.position,
            size: slot.size,
        }
    }

    /// Key of the slot's equipment, if it has any.
    pub fn equipment(slot: &Slot) -> Option<Self> {
        slot.equipment.as_ref().map(|e| ObjectKey::Equipment {
            equipment: e.key.clone(),
            position: slot.position,
            size: slot.size,
        })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Marker { brush, tile } => write!(f, "{brush}:{tile}"),
            ObjectKey::Placeholder {
                zone,
                position,
                size,
            } => write!(f, "{zone}:{position}:{}x{}", size[0], size[1]),
            ObjectKey::Equipment {
                equipment,
                position,
                size,
            } => write!(f, "{equipment}:{position}:{}x{}", size[0], size[1]),
        }
    }
}
