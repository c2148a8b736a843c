//! Grid geometry for 4-up sheets
//!
//! A 4-up sheet is twice as wide and twice as tall as the document's first
//! page. Each of the 2×2 cells has exactly the first page's size, so the
//! cells tile the sheet with no gaps and no overlap.

use crate::types::PageSize;

use super::{GridCell, Rect};

/// Cell and sheet dimensions of a 4-up sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourUpGrid {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl FourUpGrid {
    /// Grid whose cells have the size of `page`
    pub fn for_page(page: PageSize) -> Self {
        Self {
            cell_width: page.width,
            cell_height: page.height,
        }
    }

    /// Full sheet size (2w × 2h)
    pub fn sheet_size(&self) -> PageSize {
        PageSize::new(self.cell_width * 2.0, self.cell_height * 2.0)
    }

    /// Bounds of `cell`, origin at the sheet's bottom-left corner
    pub fn cell_bounds(&self, cell: GridCell) -> Rect {
        // PDF y grows upward, so row 0 (top) sits one cell height up
        let x = cell.col() as f32 * self.cell_width;
        let y = (1 - cell.row()) as f32 * self.cell_height;
        Rect::new(x, y, self.cell_width, self.cell_height)
    }

    /// Bounds of every cell in fill order
    pub fn all_cells(&self) -> [Rect; 4] {
        GridCell::ORDER.map(|cell| self.cell_bounds(cell))
    }
}
