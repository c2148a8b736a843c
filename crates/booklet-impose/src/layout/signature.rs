//! Signature pattern table
//!
//! A pattern maps each physical slot of one signature to the logical page
//! offset printed there. Slot 0 and the last slot carry the outermost leaves
//! of the folded signature and the remaining pages pair inward.
//!
//! **2-up (duplex, one fold per sheet)**, 8 pages:
//! - Slots: [8, 1, 2, 7, 6, 3, 4, 5]
//!
//! **4-up (2×2 grid, horizontal cut)**, 8 pages:
//! - Sheet A: [8, 1 / 6, 3], sheet B: [2, 7 / 4, 5]
//! - After cutting, the top and bottom halves stack into the same fold order

use crate::types::{BookletError, Result, SheetLayout, SignatureSize};
use std::sync::OnceLock;

// =============================================================================
// Pattern Table
// =============================================================================

const TWO_UP_4: [usize; 4] = [3, 0, 1, 2];
const TWO_UP_8: [usize; 8] = [7, 0, 1, 6, 5, 2, 3, 4];
const TWO_UP_16: [usize; 16] = [15, 0, 1, 14, 13, 2, 3, 12, 11, 4, 5, 10, 9, 6, 7, 8];
const TWO_UP_32: [usize; 32] = [
    31, 0, 1, 30, 29, 2, 3, 28, 27, 4, 5, 26, 25, 6, 7, 24, //
    23, 8, 9, 22, 21, 10, 11, 20, 19, 12, 13, 18, 17, 14, 15, 16,
];

const FOUR_UP_4: [usize; 4] = [3, 0, 1, 2];
const FOUR_UP_8: [usize; 8] = [7, 0, 5, 2, 1, 6, 3, 4];
const FOUR_UP_16: [usize; 16] = [15, 0, 13, 2, 1, 14, 3, 12, 11, 4, 9, 6, 5, 10, 7, 8];
const FOUR_UP_32: [usize; 32] = [
    31, 0, 29, 2, 1, 30, 3, 28, 27, 4, 25, 6, 5, 26, 7, 24, //
    23, 8, 21, 10, 9, 22, 11, 20, 19, 12, 17, 14, 13, 18, 15, 16,
];

/// Physical slot → logical offset permutation for one signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    layout: SheetLayout,
    size: SignatureSize,
    offsets: &'static [usize],
}

impl Pattern {
    /// Pattern for a typed (layout, size) pair. Every pair is in the table.
    pub fn for_signature(layout: SheetLayout, size: SignatureSize) -> Self {
        let offsets: &'static [usize] = match (layout, size) {
            (SheetLayout::TwoUp, SignatureSize::Four) => &TWO_UP_4,
            (SheetLayout::TwoUp, SignatureSize::Eight) => &TWO_UP_8,
            (SheetLayout::TwoUp, SignatureSize::Sixteen) => &TWO_UP_16,
            (SheetLayout::TwoUp, SignatureSize::ThirtyTwo) => &TWO_UP_32,
            (SheetLayout::FourUp, SignatureSize::Four) => &FOUR_UP_4,
            (SheetLayout::FourUp, SignatureSize::Eight) => &FOUR_UP_8,
            (SheetLayout::FourUp, SignatureSize::Sixteen) => &FOUR_UP_16,
            (SheetLayout::FourUp, SignatureSize::ThirtyTwo) => &FOUR_UP_32,
        };
        Self {
            layout,
            size,
            offsets,
        }
    }

    pub fn layout(&self) -> SheetLayout {
        self.layout
    }

    pub fn signature_size(&self) -> SignatureSize {
        self.size
    }

    /// Logical offset for each physical slot
    pub fn offsets(&self) -> &'static [usize] {
        self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether every offset in `0..len` appears exactly once
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.offsets.len()];
        for &offset in self.offsets {
            match seen.get_mut(offset) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Logical offset → physical slot
    pub fn inverse(&self) -> Vec<usize> {
        let mut inverse = vec![0; self.offsets.len()];
        for (slot, &offset) in self.offsets.iter().enumerate() {
            inverse[offset] = slot;
        }
        inverse
    }
}

/// Look up the pattern for an untyped signature size.
///
/// Fails with [`BookletError::UnsupportedSignature`] when `signature_size`
/// is not one of 4, 8, 16 or 32.
pub fn lookup_pattern(layout: SheetLayout, signature_size: usize) -> Result<Pattern> {
    let size = SignatureSize::try_from(signature_size)?;
    Ok(Pattern::for_signature(layout, size))
}

/// Check every table entry once; later calls reuse the first answer.
pub fn verify_pattern_table() -> Result<()> {
    static VERIFIED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    VERIFIED
        .get_or_init(|| {
            for layout in [SheetLayout::TwoUp, SheetLayout::FourUp] {
                for size in SignatureSize::ALL {
                    let pattern = Pattern::for_signature(layout, size);
                    if pattern.len() != size.pages() || !pattern.is_bijection() {
                        return Err(format!(
                            "pattern table entry {:?}/{} is not a permutation",
                            layout,
                            size.pages()
                        ));
                    }
                }
            }
            Ok(())
        })
        .clone()
        .map_err(BookletError::Config)
}

// =============================================================================
// Tests
// =============================================================================
