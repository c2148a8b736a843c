//! Blank page padding for imposition

use crate::layout::PaddingPlan;
use crate::render::{
    CopyCache, DocumentBuilder, add_number_font, get_page_dimensions, number_font_resources,
    page_number_ops,
};
use crate::types::*;
use lopdf::{Dictionary, Document};

/// Copy `source` and append blank pages up to a multiple of `signature_size`.
///
/// Fillers take the size of the first page. With `page_numbers` set each
/// filler carries its running number, continuing the stamped sequence.
pub(crate) fn pad_document(
    source: &Document,
    signature_size: SignatureSize,
    page_numbers: bool,
) -> Result<(Document, PaddingPlan)> {
    let pages = source.get_pages();
    let Some(&first_page_id) = pages.values().next() else {
        return Err(BookletError::EmptyDocument);
    };

    let plan = PaddingPlan::new(pages.len(), signature_size.pages());
    let filler_size = get_page_dimensions(source, first_page_id)?;

    let mut builder = DocumentBuilder::new();
    let mut cache = CopyCache::new();
    builder.reserve_pages(pages.values().copied(), &mut cache);
    for &page_id in pages.values() {
        builder.copy_page(source, page_id, &mut cache)?;
    }

    if plan.blanks_needed > 0 {
        let font_id = page_numbers.then(|| add_number_font(builder.document_mut()));
        let filler_box = [0.0, 0.0, filler_size.width, filler_size.height];

        for number in plan.filler_numbers() {
            let (content, resources) = match font_id {
                Some(font_id) => (
                    page_number_ops(number, filler_box).into_bytes(),
                    number_font_resources(font_id),
                ),
                None => (Vec::new(), Dictionary::new()),
            };
            builder.add_blank_page(filler_size, content, resources);
        }
        log::debug!(
            "Added {} blank page(s) to reach {} pages",
            plan.blanks_needed,
            plan.padded_total
        );
    }

    Ok((builder.finish(), plan))
}
