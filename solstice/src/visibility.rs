use serde::Serialize;

pub const FLOOR_MASK_SIZE: usize = 7;

/// A `height` x `width` grid of flags, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize, value: bool) -> Grid {
        Grid {
            width: width,
            height: height,
            cells: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out of range cells read as false.
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        self.cells[row * self.width + col]
    }

    /// Returns false, leaving the grid untouched, if the cell is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        self.cells[row * self.width + col] = value;
        true
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }
}

/// Unpacks the floor layer mask.
///
/// The mask is stored a column per byte, with bit 7 holding row 0. Rows are
/// counted from the far edge in the mask, so row `r` of the mask lands in
/// grid row `height - r - 1`.
pub fn unpack_floor_mask(mask: &[u8; FLOOR_MASK_SIZE], width: usize, height: usize) -> Grid {
    let mut grid = Grid::new(width, height, false);
    for r in 0..height {
        for c in 0..width.min(FLOOR_MASK_SIZE) {
            grid.set(height - r - 1, c, mask[c] & (0x80 >> r) != 0);
        }
    }
    grid
}
