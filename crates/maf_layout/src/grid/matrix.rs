//! Zone storage for the tiles of a site grid.
//!
//! Row-major over the grid's bounding rectangle: row = tile `y`, column = tile `x`.
use super::tile::TileCoord;
use super::zone::Zone;

/// A `height × width` matrix of [`Zone`]s, all [`Zone::Unassigned`] when created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneMatrix {
    width: usize,
    height: usize,
    cells: Vec<Zone>,
}

impl ZoneMatrix {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Zone::Unassigned; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as usize, tile.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Whether the tile lies inside the matrix bounds.
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Zone at the tile, or `None` outside the matrix.
    pub fn get(&self, tile: TileCoord) -> Option<Zone> {
        self.index(tile).map(|i| self.cells[i])
    }

    /// Writes `zone` at `tile`. Returns `true` only if the stored value changed.
    pub fn set(&mut self, tile: TileCoord, zone: Zone) -> bool {
        let Some(i) = self.index(tile) else {
            return false;
        };
        if self.cells[i] == zone {
            return false;
        }
        self.cells[i] = zone;
        true
    }

    /// Resets every cell to [`Zone::Unassigned`], keeping the dimensions.
    pub fn reset(&mut self) {
        self.cells.fill(Zone::Unassigned);
    }

    /// Number of cells holding `zone`.
    pub fn count(&self, zone: Zone) -> usize {
        self.cells.iter().filter(|z| **z == zone).count()
    }

    /// Iterates `(tile, zone)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Zone)> + '_ {
        self.cells.iter().enumerate().map(|(i, z)| {
            let x = (i % self.width.max(1)) as i32;
            let y = (i / self.width.max(1)) as i32;
            (TileCoord::new(x, y), *z)
        })
    }

    /// Numeric markers per row, the shape the calculation service expects.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|z| z.marker()).collect())
            .collect()
    }

    /// Builds a matrix from marker rows. Returns `None` for ragged rows or unknown markers.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return None;
            }
            for marker in row {
                cells.push(Zone::from_marker(*marker)?);
            }
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }
}
