//! Calculation request and response.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{TileCoord, Zone};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CalculationRequest {
    pub site_name: String,
    /// Zone markers, one row per tile `y`.
    pub matrix: Vec<Vec<u8>>,
    pub budget: u64,
    pub providers: Vec<String>,
}

/// A piece of equipment chosen for a slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquipmentItem {
    /// Catalogue identifier, part of the stable key.
    pub key: String,
    /// Model reference understood by the renderer. Empty when unknown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub provider: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: f64,
}

/// A placement rectangle in tile space, optionally holding equipment.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    /// Lower-left tile of the rectangle.
    pub position: TileCoord,
    /// `[width, height]` in tiles.
    pub size: [u32; 2],
    #[cfg_attr(feature = "serde", serde(rename = "maf_kind"))]
    pub zone: Zone,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(rename = "maf", default))]
    pub equipment: Option<EquipmentItem>,
    #[cfg_attr(feature = "serde", serde(rename = "maf_budget", default))]
    pub equipment_budget: f64,
    /// Extra rotation of the equipment model in radians, on top of the site rotation.
    #[cfg_attr(feature = "serde", serde(rename = "maf_rotation", default))]
    pub equipment_rotation: f32,
}

impl Slot {
    pub fn new(position: TileCoord, size: [u32; 2], zone: Zone) -> Self {
        Self {
            position,
            size,
            zone,
            weight: 0.0,
            equipment: None,
            equipment_budget: 0.0,
            equipment_rotation: 0.0,
        }
    }

    pub fn with_equipment(mut self, equipment: EquipmentItem) -> Self {
        self.equipment = Some(equipment);
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.equipment_rotation = radians;
        self
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn area(&self) -> u32 {
        self.size[0] * self.size[1]
    }
}

/// Slots in service order. Serialised as a bare JSON array.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalculationResponse {
    pub slots: Vec<Slot>,
}

impl CalculationResponse {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn equipment(&self) -> impl Iterator<Item = (&Slot, &EquipmentItem)> {
        self.slots
            .iter()
            .filter_map(|s| s.equipment.as_ref().map(|e| (s, e)))
    }
}

impl FromIterator<Slot> for CalculationResponse {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
