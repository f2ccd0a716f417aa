//! Brush selection.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::Zone;

/// What a stamp writes into the zone matrix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Brush {
    Sport,
    Child,
    Relax,
    Erase,
}

impl Brush {
    pub const ALL: [Brush; 4] = [Brush::Sport, Brush::Child, Brush::Relax, Brush::Erase];

    /// Zone written by this brush; erasing writes [`Zone::Unassigned`].
    pub const fn zone(self) -> Zone {
        match self {
            Brush::Sport => Zone::Sport,
            Brush::Child => Zone::Child,
            Brush::Relax => Zone::Relax,
            Brush::Erase => Zone::Unassigned,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Brush::Sport => "sport",
            Brush::Child => "child",
            Brush::Relax => "relax",
            Brush::Erase => "erase",
        }
    }
}

impl fmt::Display for Brush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Zone> for Brush {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Unassigned => Brush::Erase,
            Zone::Sport => Brush::Sport,
            Zone::Child => Brush::Child,
            Zone::Relax => Brush::Relax,
        }
    }
}
