//! Site definitions and the catalogue an operator steps through.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::GeoCoord;
use crate::service::ZonePreferences;

/// Nominal map camera for a site.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub zoom: f64,
    /// Degrees clockwise from north.
    pub bearing: f64,
    /// Degrees from vertical.
    pub pitch: f64,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            zoom: 19.0,
            bearing: 0.0,
            pitch: 60.0,
        }
    }
}

/// A site as selected by the operator. Immutable while it is set up in a session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Site {
    pub name: String,
    /// Boundary ring; the first vertex anchors the tile grid.
    pub boundary: Vec<GeoCoord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub camera: CameraPose,
    #[cfg_attr(feature = "serde", serde(default))]
    pub budget: u64,
    /// Enabled equipment providers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub providers: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub zone_preferences: ZonePreferences,
}

impl Site {
    pub fn new(name: impl Into<String>, boundary: Vec<GeoCoord>) -> Self {
        Self {
            name: name.into(),
            boundary,
            ..Default::default()
        }
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_zone_preferences(mut self, zone_preferences: ZonePreferences) -> Self {
        self.zone_preferences = zone_preferences;
        self
    }

    /// Mean of the boundary vertices, handy for pointing a camera.
    pub fn centroid(&self) -> Option<GeoCoord> {
        if self.boundary.is_empty() {
            return None;
        }
        let n = self.boundary.len() as f64;
        let (lng, lat) = self
            .boundary
            .iter()
            .fold((0.0, 0.0), |(x, y), g| (x + g.lng, y + g.lat));
        Some(GeoCoord::new(lng / n, lat / n))
    }
}

/// Ordered list of sites with a selection cursor. Navigation does not wrap around.
#[derive(Clone, Debug, Default)]
pub struct SiteCatalog {
    sites: Vec<Site>,
    selected: Option<usize>,
}

impl SiteCatalog {
    pub fn new(sites: Vec<Site>) -> Self {
        Self {
            sites,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn push(&mut self, site: Site) {
        self.sites.push(site);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.name == name)
    }

    pub fn selected(&self) -> Option<&Site> {
        self.selected.and_then(|i| self.sites.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selects the site called `name`.
    pub fn select(&mut self, name: &str) -> Option<&Site> {
        let index = self.sites.iter().position(|s| s.name == name)?;
        self.selected = Some(index);
        self.sites.get(index)
    }

    /// Selects the next site. Returns `None` (keeping the selection) at the end of the list.
    pub fn next(&mut self) -> Option<&Site> {
        let index = match self.selected {
            None if !self.sites.is_empty() => 0,
            Some(i) if i + 1 < self.sites.len() => i + 1,
            _ => return None,
        };
        self.selected = Some(index);
        self.sites.get(index)
    }

    /// Selects the previous site. Returns `None` (keeping the selection) at the start.
    pub fn previous(&mut self) -> Option<&Site> {
        let index = match self.selected {
            Some(i) if i > 0 => i - 1,
            _ => return None,
        };
        self.selected = Some(index);
        self.sites.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SiteCatalog {
        SiteCatalog::new(vec![
            Site::new("north", vec![]),
            Site::new("river", vec![]),
            Site::new("school", vec![]),
        ])
    }

    #[test]
    fn navigation_does_not_wrap() {
        let mut c = catalog();
        assert!(c.previous().is_none());
        assert_eq!(c.next().map(|s| s.name.as_str()), Some("north"));
        assert!(c.previous().is_none());
        assert_eq!(c.selected_index(), Some(0));
        c.next();
        assert_eq!(c.next().map(|s| s.name.as_str()), Some("school"));
        assert!(c.next().is_none());
        assert_eq!(c.selected().map(|s| s.name.as_str()), Some("school"));
        assert_eq!(c.previous().map(|s| s.name.as_str()), Some("river"));
    }

    #[test]
    fn select_by_name() {
        let mut c = catalog();
        assert!(c.select("lake").is_none());
        assert_eq!(c.selected_index(), None);
        assert_eq!(c.select("river").map(|s| s.name.as_str()), Some("river"));
        assert_eq!(c.selected_index(), Some(1));
    }

    #[test]
    fn centroid_averages_vertices() {
        let site = Site::new(
            "square",
            vec![
                GeoCoord::new(0.0, 0.0),
                GeoCoord::new(2.0, 0.0),
                GeoCoord::new(2.0, 2.0),
                GeoCoord::new(0.0, 2.0),
            ],
        );
        assert_eq!(site.centroid(), Some(GeoCoord::new(1.0, 1.0)));
        assert_eq!(Site::default().centroid(), None);
    }
}
