//! Generation request and response.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{TileCoord, Zone};

/// Zones the generator is allowed to use for a site.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZonePreferences {
    pub sport: bool,
    pub child: bool,
    pub relax: bool,
}

impl Default for ZonePreferences {
    fn default() -> Self {
        Self {
            sport: true,
            child: true,
            relax: true,
        }
    }
}

impl ZonePreferences {
    /// Whether `zone` is enabled. [`Zone::Unassigned`] is never a preference.
    pub fn get(&self, zone: Zone) -> bool {
        match zone {
            Zone::Unassigned => false,
            Zone::Sport => self.sport,
            Zone::Child => self.child,
            Zone::Relax => self.relax,
        }
    }

    /// Sets the preference for `zone`. Returns `true` if the value changed.
    pub fn set(&mut self, zone: Zone, enabled: bool) -> bool {
        let slot = match zone {
            Zone::Unassigned => return false,
            Zone::Sport => &mut self.sport,
            Zone::Child => &mut self.child,
            Zone::Relax => &mut self.relax,
        };
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }

    pub fn enabled(&self) -> impl Iterator<Item = Zone> + '_ {
        Zone::PAINTABLE.into_iter().filter(|z| self.get(*z))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRequest {
    pub site_name: String,
    pub boundary_tiles: Vec<TileCoord>,
    pub zone_preferences: ZonePreferences,
}

/// Tiles to mark, in service order. Serialised as `[[[x, y], "sport"], ...]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationResponse {
    pub tiles: Vec<(TileCoord, Zone)>,
}

impl GenerationResponse {
    pub fn new(tiles: Vec<(TileCoord, Zone)>) -> Self {
        Self { tiles }
    }
}

impl FromIterator<(TileCoord, Zone)> for GenerationResponse {
    fn from_iter<I: IntoIterator<Item = (TileCoord, Zone)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
