//! Zone categories painted onto tiles.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Category of a tile. The numeric marker is what the calculation service receives.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Zone {
    #[default]
    Unassigned = 0,
    Sport = 1,
    Child = 2,
    Relax = 3,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Unassigned, Zone::Sport, Zone::Child, Zone::Relax];

    /// Zones a brush can paint; excludes [`Zone::Unassigned`].
    pub const PAINTABLE: [Zone; 3] = [Zone::Sport, Zone::Child, Zone::Relax];

    #[inline]
    pub const fn marker(self) -> u8 {
        self as u8
    }

    pub const fn from_marker(marker: u8) -> Option<Zone> {
        match marker {
            0 => Some(Zone::Unassigned),
            1 => Some(Zone::Sport),
            2 => Some(Zone::Child),
            3 => Some(Zone::Relax),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Zone::Unassigned => "unassigned",
            Zone::Sport => "sport",
            Zone::Child => "child",
            Zone::Relax => "relax",
        }
    }

    /// RGB colour hint used for tiles and placeholders of this zone.
    pub const fn color(self) -> u32 {
        match self {
            Zone::Unassigned => 0x000000,
            Zone::Sport => 0xFF0000,
            Zone::Child => 0x00FF00,
            Zone::Relax => 0x0000FF,
        }
    }

    #[inline]
    pub const fn is_assigned(self) -> bool {
        !matches!(self, Zone::Unassigned)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|z| z.name() == s)
            .ok_or_else(|| Error::Other(format!("unknown zone '{s}'")))
    }
}
