//! Shared constants for booklet imposition
//!
//! This module centralizes magic numbers and constants used throughout
//! the imposition process.

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// PDF version written for every generated document
pub const OUTPUT_PDF_VERSION: &str = "1.7";

// =============================================================================
// Page Numbers
// =============================================================================

/// Font size for stamped page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 12.0;

/// Distance of the page number baseline from the bottom edge (points)
pub const PAGE_NUMBER_OFFSET_Y: f32 = 30.0;

/// Shift left of the page centre for rough centring of the number (points)
pub const PAGE_NUMBER_OFFSET_X: f32 = 10.0;

/// Resource name of the stamp font, chosen to avoid clashing with document fonts
pub const PAGE_NUMBER_FONT_NAME: &str = "BkltPgNum";

// =============================================================================
// Sheets
// =============================================================================

/// Cells on a 4-up sheet (2 columns × 2 rows)
pub const FOUR_UP_CELLS: usize = 4;

/// Maximum depth followed when resolving inherited page attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 64;
