use crate::layout::PaddingPlan;
use crate::options::ImpositionOptions;
use crate::types::*;

/// Calculate statistics for imposing a document of `source_pages` pages
pub fn calculate_statistics(
    source_pages: usize,
    options: &ImpositionOptions,
) -> Result<ImpositionStatistics> {
    if source_pages == 0 {
        return Err(BookletError::EmptyDocument);
    }

    let size = options.signature_size.pages();
    let padding = PaddingPlan::new(source_pages, size);
    let signatures = padding.padded_total / size;
    let pages_per_output_page = options.layout.pages_per_sheet();

    Ok(ImpositionStatistics {
        source_pages,
        blank_pages_added: padding.blanks_needed,
        padded_pages: padding.padded_total,
        signatures,
        output_pages: padding.padded_total / pages_per_output_page,
        pages_per_output_page,
    })
}
