//! 2-up signature imposition (one page per output page, folded)

use crate::layout::ImpositionPlan;
use crate::render::{CopyCache, DocumentBuilder};
use crate::types::*;
use lopdf::{Document, ObjectId};

/// Copy the pages of `source` in the order the plan prints them.
pub(crate) fn impose_two_up(source: &Document, plan: &ImpositionPlan) -> Result<Document> {
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

    let mut builder = DocumentBuilder::new();
    let mut cache = CopyCache::new();
    builder.reserve_pages(
        plan.slots
            .iter()
            .filter_map(|slot| page_ids.get(slot.source_page).copied()),
        &mut cache,
    );

    for slot in &plan.slots {
        let Some(&page_id) = page_ids.get(slot.source_page) else {
            log::warn!(
                "Source page {} missing from the padded document, skipping",
                slot.source_page + 1
            );
            continue;
        };
        builder.copy_page(source, page_id, &mut cache)?;
    }

    Ok(builder.finish())
}
