//! 4-up sheet rendering
//!
//! Each output page is a 2×2 grid twice the size of the first source page.
//! Source pages are drawn as Form XObjects created once per source page.

use crate::layout::{
    FourUpGrid, FourUpSheet, ImpositionPlan, MediaBox, place_sheet, placement_command,
};
use crate::render::{
    CopyCache, DocumentBuilder, create_page_xobject, get_page_dimensions, media_box,
    page_media_box,
};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Render every 4-up sheet of the plan into a new document
pub(crate) fn impose_four_up(source: &Document, plan: &ImpositionPlan) -> Result<Document> {
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    let Some(&first_page_id) = page_ids.first() else {
        return Err(BookletError::EmptyDocument);
    };

    let grid = FourUpGrid::for_page(get_page_dimensions(source, first_page_id)?);
    let media_boxes = page_ids
        .iter()
        .map(|&id| page_media_box(source, id))
        .collect::<Result<Vec<MediaBox>>>()?;

    let mut builder = DocumentBuilder::new();
    let mut cache = CopyCache::new();
    let mut xobjects: HashMap<usize, ObjectId> = HashMap::new();

    for sheet in &plan.sheets {
        let page_dict = render_sheet(
            builder.document_mut(),
            source,
            &page_ids,
            &media_boxes,
            &grid,
            sheet,
            &mut cache,
            &mut xobjects,
        )?;
        builder.add_page(page_dict);
    }

    log::debug!(
        "Rendered {} 4-up sheet(s) of {}×{} pt",
        builder.page_count(),
        grid.sheet_size().width,
        grid.sheet_size().height
    );
    Ok(builder.finish())
}

/// Build the page dictionary for one sheet
#[allow(clippy::too_many_arguments)]
fn render_sheet(
    output: &mut Document,
    source: &Document,
    page_ids: &[ObjectId],
    media_boxes: &[MediaBox],
    grid: &FourUpGrid,
    sheet: &FourUpSheet,
    cache: &mut CopyCache,
    xobjects: &mut HashMap<usize, ObjectId>,
) -> Result<Dictionary> {
    let mut content_ops = Vec::new();
    let mut xobject_names = Dictionary::new();

    let placements = place_sheet(grid, sheet, |idx| {
        media_boxes
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, grid.cell_width, grid.cell_height])
    });

    for (idx, placement) in placements.iter().enumerate() {
        let Some(&page_id) = page_ids.get(placement.source_page) else {
            log::warn!(
                "Source page {} missing from the padded document, leaving cell blank",
                placement.source_page + 1
            );
            continue;
        };

        let xobject_id = match xobjects.get(&placement.source_page) {
            Some(&id) => id,
            None => {
                let id = create_page_xobject(output, source, page_id, cache)?;
                xobjects.insert(placement.source_page, id);
                id
            }
        };

        let xobject_name = format!("P{}", idx);
        xobject_names.set(xobject_name.as_bytes(), Object::Reference(xobject_id));
        content_ops.push(placement_command(&xobject_name, placement));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobject_names));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("MediaBox", media_box(grid.sheet_size()));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));
    Ok(page_dict)
}
