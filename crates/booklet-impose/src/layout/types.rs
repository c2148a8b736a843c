//! Layout data types for imposition
//!
//! These types represent the intermediate layout calculations between
//! signature ordering and PDF rendering.

/// A cell of a 4-up sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCell {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl GridCell {
    /// Cells in the order consecutive pattern entries fill them
    pub const ORDER: [GridCell; 4] = [
        GridCell::TopLeft,
        GridCell::TopRight,
        GridCell::BottomLeft,
        GridCell::BottomRight,
    ];

    /// Row index (0 = top row)
    pub fn row(self) -> usize {
        match self {
            GridCell::TopLeft | GridCell::TopRight => 0,
            GridCell::BottomLeft | GridCell::BottomRight => 1,
        }
    }

    /// Column index (0 = left column)
    pub fn col(self) -> usize {
        match self {
            GridCell::TopLeft | GridCell::BottomLeft => 0,
            GridCell::TopRight | GridCell::BottomRight => 1,
        }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the interiors of two rectangles intersect (shared edges don't count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }
}

/// One physical slot of a signature and the source page printed there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    /// Signature index (0-based, ascending)
    pub signature: usize,
    /// Physical position within the signature
    pub slot: usize,
    /// 0-based index into the padded source document
    pub source_page: usize,
}

/// Source pages for the four cells of one 4-up sheet (None = blank cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FourUpSheet {
    pub signature: usize,
    pub cells: [Option<usize>; 4],
}

impl FourUpSheet {
    /// Source page printed in `cell`
    pub fn source_for(&self, cell: GridCell) -> Option<usize> {
        let idx = GridCell::ORDER
            .iter()
            .position(|&c| c == cell)
            .unwrap_or_default();
        self.cells[idx]
    }

    /// (cell, source page) pairs for the occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = (GridCell, usize)> + '_ {
        GridCell::ORDER
            .iter()
            .zip(self.cells.iter())
            .filter_map(|(&cell, source)| source.map(|idx| (cell, idx)))
    }
}

/// Final placement of a source page on a 4-up sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub cell: GridCell,
    pub source_page: usize,
    /// Cell area the page is stretched into
    pub target: Rect,
    /// Horizontal scale factor applied to the source page
    pub scale_x: f32,
    /// Vertical scale factor applied to the source page
    pub scale_y: f32,
    /// Translation applied after scaling, so the source origin lands on the cell
    pub translate_x: f32,
    pub translate_y: f32,
}
