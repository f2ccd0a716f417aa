//! Stand-in generation and calculation services for the demos.
use std::f32::consts::FRAC_PI_2;

use maf_layout::prelude::*;

/// Fills the interior of the boundary with vertical bands of the enabled zones.
#[derive(Clone, Debug)]
pub struct BandGenerator {
    /// Band width in tiles.
    pub band_width: u32,
}

impl Default for BandGenerator {
    fn default() -> Self {
        Self { band_width: 6 }
    }
}

impl GenerationService for BandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let zones: Vec<Zone> = request.zone_preferences.enabled().collect();
        if zones.is_empty() {
            return Ok(GenerationResponse::new(Vec::new()));
        }
        let boundary = BoundaryTiles::new(request.boundary_tiles.clone());
        let max_x = boundary.iter().map(|t| t.x).max().unwrap_or(0);
        let max_y = boundary.iter().map(|t| t.y).max().unwrap_or(0);
        let band = self.band_width.max(1) as i32;

        let mut tiles = Vec::new();
        for y in 0..max_y {
            for x in 0..max_x {
                let tile = TileCoord::new(x, y);
                if boundary.contains_tile(tile) {
                    tiles.push((tile, zones[(x / band) as usize % zones.len()]));
                }
            }
        }
        Ok(GenerationResponse::new(tiles))
    }
}

/// A piece of equipment the placer may choose.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub zone: Zone,
    /// `[width, height]` in tiles.
    pub size: [u32; 2],
    pub item: EquipmentItem,
}

impl CatalogEntry {
    pub fn new(zone: Zone, size: [u32; 2], key: &str, provider: &str, cost: f64) -> Self {
        Self {
            zone,
            size,
            item: EquipmentItem {
                key: key.to_owned(),
                model: key.to_owned(),
                name: key.replace('-', " "),
                provider: provider.to_owned(),
                cost,
            },
        }
    }
}

/// Tile rectangle, `(x, y)` being its lower-left tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl TileRect {
    pub fn area(&self) -> u32 {
        self.w * self.h
    }
}

/// Largest all-`true` rectangle of a row-major grid (rows indexed by `y`).
pub fn largest_rectangle(free: &[Vec<bool>]) -> Option<TileRect> {
    let width = free.first().map_or(0, Vec::len);
    let mut heights = vec![0u32; width];
    let mut best: Option<TileRect> = None;

    for (y, row) in free.iter().enumerate() {
        for (x, cell) in row.iter().enumerate().take(width) {
            heights[x] = if *cell { heights[x] + 1 } else { 0 };
        }

        let mut stack: Vec<usize> = Vec::new();
        for x in 0..=width {
            let h = if x < width { heights[x] } else { 0 };
            while let Some(&top) = stack.last() {
                if heights[top] < h {
                    break;
                }
                stack.pop();
                let height = heights[top];
                let left = stack.last().map_or(0, |l| l + 1);
                let w = (x - left) as u32;
                if height > 0 && best.is_none_or(|b| w * height > b.area()) {
                    best = Some(TileRect {
                        x: left as i32,
                        y: (y + 1) as i32 - height as i32,
                        w,
                        h: height,
                    });
                }
            }
            if x < width {
                stack.push(x);
            }
        }
    }
    best
}

/// Splits every zone into maximal rectangles and fills them from a catalogue within budget.
#[derive(Clone, Debug)]
pub struct GreedyPlacer {
    pub catalog: Vec<CatalogEntry>,
    /// Rectangles are cut down to at most this many tiles per side.
    pub max_extent: u32,
    /// Smaller rectangles are left empty.
    pub min_area: u32,
}

impl Default for GreedyPlacer {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            max_extent: 10,
            min_area: 2,
        }
    }
}

impl GreedyPlacer {
    pub fn with_catalog(catalog: Vec<CatalogEntry>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Most expensive entry that fits the slot, the budget and the enabled providers.
    fn pick(
        &self,
        slot: &Slot,
        remaining: f64,
        providers: &[String],
    ) -> Option<(&CatalogEntry, bool)> {
        self.catalog
            .iter()
            .filter(|e| e.zone == slot.zone && e.item.cost <= remaining)
            .filter(|e| providers.is_empty() || providers.contains(&e.item.provider))
            .filter_map(|e| {
                let [w, h] = e.size;
                if w <= slot.width() && h <= slot.height() {
                    Some((e, false))
                } else if h <= slot.width() && w <= slot.height() {
                    Some((e, true))
                } else {
                    None
                }
            })
            .max_by(|(a, _), (b, _)| a.item.cost.total_cmp(&b.item.cost))
    }
}

impl CalculationService for GreedyPlacer {
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        let matrix = ZoneMatrix::from_rows(&request.matrix).ok_or_else(|| {
            Error::service_unavailable(ServiceKind::Calculation, "malformed zone matrix")
        })?;
        let mut remaining = request.budget as f64;
        let mut slots = Vec::new();

        for zone in Zone::PAINTABLE {
            let mut free: Vec<Vec<bool>> = (0..matrix.height())
                .map(|y| {
                    (0..matrix.width())
                        .map(|x| matrix.get(TileCoord::new(x as i32, y as i32)) == Some(zone))
                        .collect()
                })
                .collect();

            while let Some(rect) = largest_rectangle(&free) {
                let rect = TileRect {
                    w: rect.w.min(self.max_extent),
                    h: rect.h.min(self.max_extent),
                    ..rect
                };
                if rect.area() < self.min_area.max(1) {
                    break;
                }
                for y in rect.y..rect.y + rect.h as i32 {
                    for x in rect.x..rect.x + rect.w as i32 {
                        free[y as usize][x as usize] = false;
                    }
                }

                let mut slot = Slot::new(TileCoord::new(rect.x, rect.y), [rect.w, rect.h], zone)
                    .with_weight(rect.area() as f32);
                if let Some((entry, rotated)) = self.pick(&slot, remaining, &request.providers) {
                    let item = entry.item.clone();
                    remaining -= item.cost;
                    slot.equipment_budget = item.cost;
                    slot = slot.with_equipment(item);
                    if rotated {
                        slot = slot.with_rotation(FRAC_PI_2);
                    }
                }
                slots.push(slot);
            }
        }

        tracing::debug!(
            "Placed {} slots, {:.0} of budget left.",
            slots.len(),
            remaining
        );
        Ok(CalculationResponse::new(slots))
    }
}

/// A small catalogue spread over two providers.
pub fn demo_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(Zone::Sport, [3, 2], "table-tennis", "acme", 2400.0),
        CatalogEntry::new(Zone::Sport, [2, 2], "basketball-hoop", "acme", 1800.0),
        CatalogEntry::new(Zone::Sport, [4, 4], "climbing-frame", "playcraft", 8900.0),
        CatalogEntry::new(Zone::Child, [3, 2], "swing", "playcraft", 1200.5),
        CatalogEntry::new(Zone::Child, [2, 4], "slide", "acme", 3400.0),
        CatalogEntry::new(Zone::Child, [3, 3], "sandbox", "playcraft", 900.0),
        CatalogEntry::new(Zone::Relax, [2, 1], "bench", "acme", 450.0),
        CatalogEntry::new(Zone::Relax, [4, 3], "pergola", "playcraft", 5200.0),
    ]
}

/// Demo models are authored in centimetres.
const DEMO_MODEL_SCALE: f32 = 0.01;

/// Models for [`demo_catalog`], leaving out `pergola` so it renders as a bare placeholder.
pub fn demo_models() -> ModelRegistry {
    let mut models = ModelRegistry::new();
    for entry in demo_catalog() {
        if entry.item.model != "pergola" {
            let source = format!("models/{}.glb", entry.item.model);
            models.register(
                entry.item.model.clone(),
                ModelEntry::new(source).with_scale(DEMO_MODEL_SCALE),
            );
        }
    }
    models
}
