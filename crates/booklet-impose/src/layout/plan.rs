//! Physical page order for a whole document
//!
//! Signatures are consecutive blocks of `signature_size` pages taken in
//! ascending order. Within a signature, physical slot `p` carries source page
//! `base + pattern[p]`. For 4-up sheets each run of four consecutive slots
//! becomes one sheet, filling the cells top-left, top-right, bottom-left,
//! bottom-right.

use crate::constants::FOUR_UP_CELLS;
use crate::types::{BookletError, Result, SheetLayout, SignatureSize};

use super::{FourUpSheet, Pattern, SlotAssignment, verify_pattern_table};

/// Output order of one imposition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpositionPlan {
    pub layout: SheetLayout,
    pub signature_size: SignatureSize,
    pub total_pages: usize,
    pub signatures: usize,
    /// Every slot that received a source page, in output order
    pub slots: Vec<SlotAssignment>,
    /// 4-up sheets in output order; empty for 2-up
    pub sheets: Vec<FourUpSheet>,
}

impl ImpositionPlan {
    /// Source page indices in output order
    pub fn page_order(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.source_page).collect()
    }

    /// Pages (2-up) or sheets (4-up) the output document will have
    pub fn output_pages(&self) -> usize {
        match self.layout {
            SheetLayout::TwoUp => self.slots.len(),
            SheetLayout::FourUp => self.sheets.len(),
        }
    }
}

/// Compute the output order for a document of `total_pages` pages.
///
/// `total_pages` is normally already padded to a multiple of the signature
/// size. A partial final signature is still laid out; its slots that point
/// past the end are skipped and logged.
pub fn plan_imposition(
    total_pages: usize,
    layout: SheetLayout,
    signature_size: SignatureSize,
) -> Result<ImpositionPlan> {
    if total_pages == 0 {
        return Err(BookletError::EmptyDocument);
    }
    verify_pattern_table()?;

    let pattern = Pattern::for_signature(layout, signature_size);
    let size = signature_size.pages();
    let signatures = total_pages.div_ceil(size);

    let mut slots = Vec::with_capacity(signatures * size);
    let mut sheets = Vec::new();

    for signature in 0..signatures {
        let base = signature * size;
        let mut cells: Vec<Option<usize>> = Vec::with_capacity(size);

        for (slot, &offset) in pattern.offsets().iter().enumerate() {
            let source_page = base + offset;
            if source_page >= total_pages {
                log::warn!(
                    "Signature {} slot {} points past the last page ({} >= {}), leaving it blank",
                    signature + 1,
                    slot,
                    source_page,
                    total_pages
                );
                cells.push(None);
                continue;
            }
            slots.push(SlotAssignment {
                signature,
                slot,
                source_page,
            });
            cells.push(Some(source_page));
        }

        if layout == SheetLayout::FourUp {
            for chunk in cells.chunks(FOUR_UP_CELLS) {
                let mut sheet = FourUpSheet {
                    signature,
                    cells: [None; FOUR_UP_CELLS],
                };
                sheet.cells[..chunk.len()].copy_from_slice(chunk);
                sheets.push(sheet);
            }
        }
    }

    log::debug!(
        "Planned {} signature(s) of {} pages for {} pages ({:?})",
        signatures,
        size,
        total_pages,
        layout
    );

    Ok(ImpositionPlan {
        layout,
        signature_size,
        total_pages,
        signatures,
        slots,
        sheets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_based(plan: &ImpositionPlan) -> Vec<usize> {
        plan.page_order().iter().map(|p| p + 1).collect()
    }

    #[test]
    fn test_two_up_padded_ten_pages() {
        let plan = plan_imposition(12, SheetLayout::TwoUp, SignatureSize::Four).unwrap();
        assert_eq!(plan.signatures, 3);
        assert_eq!(one_based(&plan), vec![4, 1, 2, 3, 8, 5, 6, 7, 12, 9, 10, 11]);
    }

    #[test]
    fn test_two_up_eight_pages() {
        let plan = plan_imposition(8, SheetLayout::TwoUp, SignatureSize::Eight).unwrap();
        assert_eq!(one_based(&plan), vec![8, 1, 2, 7, 6, 3, 4, 5]);
        assert_eq!(plan.output_pages(), 8);
        assert!(plan.sheets.is_empty());
    }

    #[test]
    fn test_inverse_recovers_reading_order() {
        for layout in [SheetLayout::TwoUp, SheetLayout::FourUp] {
            for size in SignatureSize::ALL {
                let s = size.pages();
                let plan = plan_imposition(s, layout, size).unwrap();
                let order = plan.page_order();
                let inverse = Pattern::for_signature(layout, size).inverse();
                let recovered: Vec<usize> = inverse.iter().map(|&slot| order[slot]).collect();
                assert_eq!(recovered, (0..s).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_four_up_sheets() {
        let plan = plan_imposition(16, SheetLayout::FourUp, SignatureSize::Eight).unwrap();
        assert_eq!(plan.output_pages(), 4);
        assert_eq!(plan.sheets[0].cells, [Some(7), Some(0), Some(5), Some(2)]);
        assert_eq!(plan.sheets[1].cells, [Some(1), Some(6), Some(3), Some(4)]);
        assert_eq!(plan.sheets[2].cells, [Some(15), Some(8), Some(13), Some(10)]);
        assert_eq!(plan.sheets[3].signature, 1);
        assert_eq!(plan.sheets[0].source_for(crate::layout::GridCell::BottomLeft), Some(5));
    }

    #[test]
    fn test_partial_signature_skips_missing_pages() {
        let plan = plan_imposition(6, SheetLayout::TwoUp, SignatureSize::Four).unwrap();
        assert_eq!(plan.signatures, 2);
        // Second signature would be [7, 4, 5, 6]; page 7 and 8 do not exist
        assert_eq!(one_based(&plan), vec![4, 1, 2, 3, 5, 6]);

        let plan = plan_imposition(6, SheetLayout::FourUp, SignatureSize::Four).unwrap();
        assert_eq!(plan.sheets[1].cells, [None, Some(4), Some(5), None]);
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(
            plan_imposition(0, SheetLayout::TwoUp, SignatureSize::Four),
            Err(BookletError::EmptyDocument)
        ));
    }
}
