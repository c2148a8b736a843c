//! Content placement within 4-up cells
//!
//! Every source page is stretched to fill its cell exactly, whatever its own
//! size, so mixed-size documents still fold into a uniform booklet.

use super::{FourUpGrid, FourUpSheet, GridCell, PagePlacement, Rect};

/// Source page box in PDF user space: `[llx, lly, urx, ury]`
pub type MediaBox = [f32; 4];

/// Place a page with the given media box into `target`.
///
/// A degenerate media box (zero width or height) keeps a unit scale on that
/// axis instead of dividing by zero.
pub fn place_page(
    cell: GridCell,
    source_page: usize,
    media_box: MediaBox,
    target: Rect,
) -> PagePlacement {
    let [llx, lly, urx, ury] = media_box;
    let scale_x = axis_scale(target.width, urx - llx);
    let scale_y = axis_scale(target.height, ury - lly);

    PagePlacement {
        cell,
        source_page,
        target,
        scale_x,
        scale_y,
        translate_x: target.x - llx * scale_x,
        translate_y: target.y - lly * scale_y,
    }
}

/// Placements for the occupied cells of one sheet.
///
/// `media_box` returns the box of a source page by index.
pub fn place_sheet(
    grid: &FourUpGrid,
    sheet: &FourUpSheet,
    mut media_box: impl FnMut(usize) -> MediaBox,
) -> Vec<PagePlacement> {
    sheet
        .occupied()
        .map(|(cell, source)| place_page(cell, source, media_box(source), grid.cell_bounds(cell)))
        .collect()
}

fn axis_scale(target: f32, source: f32) -> f32 {
    if source.abs() < f32::EPSILON {
        1.0
    } else {
        target / source
    }
}

/// Content stream operator drawing a placed XObject
pub fn placement_command(xobject_name: &str, placement: &PagePlacement) -> String {
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        placement.scale_x,
        placement.scale_y,
        placement.translate_x,
        placement.translate_y,
        xobject_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageSize;

    #[test]
    fn test_same_size_page_is_translated_only() {
        let target = Rect::new(612.0, 792.0, 612.0, 792.0);
        let placement = place_page(GridCell::TopRight, 3, [0.0, 0.0, 612.0, 792.0], target);
        assert_eq!(placement.scale_x, 1.0);
        assert_eq!(placement.scale_y, 1.0);
        assert_eq!(placement.translate_x, 612.0);
        assert_eq!(placement.translate_y, 792.0);
    }

    #[test]
    fn test_mismatched_page_is_stretched() {
        let target = Rect::new(0.0, 0.0, 600.0, 800.0);
        let placement = place_page(GridCell::BottomLeft, 0, [0.0, 0.0, 300.0, 200.0], target);
        assert_eq!(placement.scale_x, 2.0);
        assert_eq!(placement.scale_y, 4.0);
    }

    #[test]
    fn test_offset_media_box_lands_on_cell_origin() {
        let target = Rect::new(100.0, 0.0, 100.0, 100.0);
        let placement = place_page(GridCell::BottomRight, 0, [50.0, 50.0, 150.0, 150.0], target);
        // llx maps to the cell's left edge
        assert_eq!(50.0 * placement.scale_x + placement.translate_x, 100.0);
        assert_eq!(50.0 * placement.scale_y + placement.translate_y, 0.0);
    }

    #[test]
    fn test_blank_cells_are_not_placed() {
        let grid = FourUpGrid::for_page(PageSize::new(100.0, 100.0));
        let sheet = FourUpSheet {
            signature: 0,
            cells: [Some(3), Some(0), None, Some(2)],
        };
        let placements = place_sheet(&grid, &sheet, |_| [0.0, 0.0, 100.0, 100.0]);
        let cells: Vec<_> = placements.iter().map(|p| p.cell).collect();
        assert_eq!(
            cells,
            vec![GridCell::TopLeft, GridCell::TopRight, GridCell::BottomRight]
        );
    }

    #[test]
    fn test_placement_command_format() {
        let placement = place_page(
            GridCell::TopLeft,
            0,
            [0.0, 0.0, 100.0, 100.0],
            Rect::new(0.0, 100.0, 100.0, 100.0),
        );
        assert_eq!(placement_command("P0", &placement), "q 1 0 0 1 0 100 cm /P0 Do Q\n");
    }
}
