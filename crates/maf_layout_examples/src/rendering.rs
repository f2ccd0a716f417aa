use std::path::Path;

use glam::IVec2;
use image::{Rgb, RgbImage};
use maf_layout::prelude::*;

/// Installs a fmt subscriber honouring `RUST_LOG` (defaults to `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

/// Pixel layout of a rendered zone matrix.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Edge length of one tile in pixels.
    pub tile_px: u32,
    pub background: [u8; 3],
    pub boundary: [u8; 3],
    pub slot_outline: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_px: 16,
            background: [26, 26, 26],
            boundary: [235, 235, 235],
            slot_outline: [255, 215, 0],
        }
    }
}

impl RenderConfig {
    pub fn with_tile_px(mut self, tile_px: u32) -> Self {
        self.tile_px = tile_px.max(1);
        self
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }
}

fn rgb(hex: u32) -> Rgb<u8> {
    let [_, r, g, b] = hex.to_be_bytes();
    Rgb([r, g, b])
}

/// Top-left pixel of a tile corner. Tile `y` grows upwards, image rows downwards.
fn corner_px(config: &RenderConfig, height: usize, x: i32, y: i32) -> IVec2 {
    let s = config.tile_px as i32;
    IVec2::new(x * s, (height as i32 - y) * s)
}

fn put(img: &mut RgbImage, p: IVec2, color: Rgb<u8>) {
    if p.x >= 0 && p.y >= 0 && (p.x as u32) < img.width() && (p.y as u32) < img.height() {
        img.put_pixel(p.x as u32, p.y as u32, color);
    }
}

fn line(img: &mut RgbImage, a: IVec2, b: IVec2, color: Rgb<u8>) {
    let d = IVec2::new((b.x - a.x).abs(), -(b.y - a.y).abs());
    let step = IVec2::new((b.x - a.x).signum(), (b.y - a.y).signum());
    let mut p = a;
    let mut err = d.x + d.y;
    loop {
        put(img, p, color);
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= d.y {
            err += d.y;
            p.x += step.x;
        }
        if e2 <= d.x {
            err += d.x;
            p.y += step.y;
        }
    }
}

/// Renders the matrix with one colour per zone and the boundary ring on top.
pub fn render_zone_matrix(
    matrix: &ZoneMatrix,
    boundary: &BoundaryTiles,
    config: &RenderConfig,
) -> RgbImage {
    let s = config.tile_px;
    let width = (matrix.width() as u32 * s).max(1) + 1;
    let height = (matrix.height() as u32 * s).max(1) + 1;
    let mut img = RgbImage::from_pixel(width, height, Rgb(config.background));

    for (tile, zone) in matrix.iter() {
        if !zone.is_assigned() {
            continue;
        }
        let top_left = corner_px(config, matrix.height(), tile.x, tile.y + 1);
        for dy in 0..s as i32 {
            for dx in 0..s as i32 {
                put(&mut img, top_left + IVec2::new(dx, dy), rgb(zone.color()));
            }
        }
    }

    let ring = boundary.as_slice();
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        line(
            &mut img,
            corner_px(config, matrix.height(), a.x, a.y),
            corner_px(config, matrix.height(), b.x, b.y),
            Rgb(config.boundary),
        );
    }
    img
}

/// Like [`render_zone_matrix`], with every slot of `response` outlined.
pub fn render_layout(
    matrix: &ZoneMatrix,
    boundary: &BoundaryTiles,
    response: &CalculationResponse,
    config: &RenderConfig,
) -> RgbImage {
    let mut img = render_zone_matrix(matrix, boundary, config);
    let h = matrix.height();
    for slot in &response.slots {
        let (x0, y0) = (slot.position.x, slot.position.y);
        let (x1, y1) = (x0 + slot.width() as i32, y0 + slot.height() as i32);
        let corners = [
            corner_px(config, h, x0, y0),
            corner_px(config, h, x1, y0),
            corner_px(config, h, x1, y1),
            corner_px(config, h, x0, y1),
        ];
        for i in 0..4 {
            line(
                &mut img,
                corners[i],
                corners[(i + 1) % 4],
                Rgb(config.slot_outline),
            );
        }
    }
    img
}

pub fn render_zone_matrix_to_png(
    matrix: &ZoneMatrix,
    boundary: &BoundaryTiles,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    render_zone_matrix(matrix, boundary, config).save(path.as_ref())?;
    tracing::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

pub fn render_layout_to_png(
    matrix: &ZoneMatrix,
    boundary: &BoundaryTiles,
    response: &CalculationResponse,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    render_layout(matrix, boundary, response, config).save(path.as_ref())?;
    tracing::info!("Wrote {}", path.as_ref().display());
    Ok(())
}
