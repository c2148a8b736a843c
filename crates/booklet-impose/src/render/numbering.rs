//! Page number stamping
//!
//! Numbers are drawn at the bottom centre of each page in 12pt Helvetica.
//! The page's own content is bracketed with `q`/`Q` so whatever graphics
//! state it leaves behind cannot move or recolour the number.

use crate::constants::{
    PAGE_NUMBER_FONT_NAME, PAGE_NUMBER_FONT_SIZE, PAGE_NUMBER_OFFSET_X, PAGE_NUMBER_OFFSET_Y,
};
use crate::layout::MediaBox;
use crate::types::{BookletError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::builder::DocumentBuilder;
use super::xobject::{CopyCache, page_media_box};

/// Copy `source` with every page stamped with its 1-based number.
pub fn number_pages(source: &Document) -> Result<Document> {
    let pages = source.get_pages();
    if pages.is_empty() {
        return Err(BookletError::EmptyDocument);
    }

    let mut builder = DocumentBuilder::new();
    let font_id = add_number_font(builder.document_mut());
    let mut cache = CopyCache::new();
    builder.reserve_pages(pages.values().copied(), &mut cache);

    for (number, page_id) in pages.into_values().enumerate().map(|(i, id)| (i + 1, id)) {
        let copy_id = builder.copy_page(source, page_id, &mut cache)?;
        stamp_page(builder.document_mut(), copy_id, number, font_id)?;
    }

    log::debug!("Numbered {} page(s)", builder.page_count());
    Ok(builder.finish())
}

/// Add the Helvetica font used for page numbers
pub(crate) fn add_number_font(doc: &mut Document) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(font_dict)
}

/// Text operators drawing `number` on a page with the given box
pub(crate) fn page_number_ops(number: usize, media_box: MediaBox) -> String {
    let [llx, lly, urx, _] = media_box;
    let x = llx + (urx - llx) / 2.0 - PAGE_NUMBER_OFFSET_X;
    let y = lly + PAGE_NUMBER_OFFSET_Y;
    format!(
        "BT /{} {} Tf 0 g {} {} Td ({}) Tj ET\n",
        PAGE_NUMBER_FONT_NAME, PAGE_NUMBER_FONT_SIZE, x, y, number
    )
}

/// Resources holding only the page number font
pub(crate) fn number_font_resources(font_id: ObjectId) -> Dictionary {
    let mut fonts = Dictionary::new();
    fonts.set(PAGE_NUMBER_FONT_NAME, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources
}

/// Stamp `number` onto a page that already lives in `doc`.
fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    number: usize,
    font_id: ObjectId,
) -> Result<()> {
    let media_box = page_media_box(doc, page_id)?;
    let page = doc.get_dictionary(page_id)?;

    let original: Vec<Object> = match page.get(b"Contents") {
        Ok(Object::Array(parts)) => parts.clone(),
        Ok(contents @ Object::Reference(_)) => vec![contents.clone()],
        _ => Vec::new(),
    };

    let mut resources = match page.get(b"Resources") {
        Ok(obj) => doc.dereference(obj)?.1.as_dict().cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font") {
        Ok(obj) => doc.dereference(obj)?.1.as_dict().cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };
    fonts.set(PAGE_NUMBER_FONT_NAME, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp = format!("Q\n{}", page_number_ops(number, media_box));
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp.into_bytes()));

    let mut contents = Vec::with_capacity(original.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(original);
    contents.push(Object::Reference(stamp_id));

    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}
