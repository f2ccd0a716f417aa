use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use maf_layout::prelude::Site;
use serde::{Deserialize, Serialize};

/// Asset describing one [`Site`], written in RON:
///
/// ```ron
/// (
///     name: "Riverside",
///     boundary: [(7.1, 50.7), (7.1004, 50.7), (7.1004, 50.7003)],
///     budget: 40000,
///     providers: ["acme"],
/// )
/// ```
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteAsset {
    pub site: Site,
}

impl From<Site> for SiteAsset {
    fn from(site: Site) -> Self {
        Self { site }
    }
}

/// Asset loader for [`SiteAsset`] using RON files with `.site` extension.
#[derive(TypePath)]
pub struct SiteAssetLoader;

impl AssetLoader for SiteAssetLoader {
    type Asset = SiteAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["site"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_site(&bytes)
        })
    }
}

impl FromWorld for SiteAssetLoader {
    fn from_world(_: &mut World) -> Self {
        SiteAssetLoader
    }
}

fn parse_site(bytes: &[u8]) -> anyhow::Result<SiteAsset> {
    let asset: SiteAsset = ron::de::from_bytes(bytes).map_err(|e| anyhow::anyhow!(e))?;
    if asset.site.boundary.len() < 3 {
        warn!(
            "Site '{}' has {} boundary vertices; its grid will be empty.",
            asset.site.name,
            asset.site.boundary.len()
        );
    }
    Ok(asset)
}
