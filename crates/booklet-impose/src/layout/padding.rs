//! Padding calculation
//!
//! A document is imposed in whole signatures, so its page count is rounded up
//! to the next multiple of the signature size with blank filler pages.

/// Filler pages needed so `total_pages` becomes a multiple of `signature_size`.
///
/// Always in `0..signature_size`. A zero `signature_size` needs no padding.
pub fn compute_padding(total_pages: usize, signature_size: usize) -> usize {
    if signature_size == 0 {
        return 0;
    }
    (signature_size - total_pages % signature_size) % signature_size
}

/// Padding needed for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPlan {
    pub source_pages: usize,
    pub blanks_needed: usize,
    pub padded_total: usize,
}

impl PaddingPlan {
    pub fn new(total_pages: usize, signature_size: usize) -> Self {
        let blanks_needed = compute_padding(total_pages, signature_size);
        Self {
            source_pages: total_pages,
            blanks_needed,
            padded_total: total_pages + blanks_needed,
        }
    }

    /// Running numbers (1-based) the filler pages carry
    pub fn filler_numbers(&self) -> std::ops::RangeInclusive<usize> {
        self.source_pages + 1..=self.padded_total
    }
}
