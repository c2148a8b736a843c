//! XObject creation and object copying
//!
//! Source pages are either copied page-for-page into a new document or
//! wrapped as Form XObjects and drawn onto 4-up sheets with a transformation.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::layout::MediaBox;
use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Maps source object ids to their copies in the output document
pub type CopyCache = HashMap<ObjectId, ObjectId>;

// =============================================================================
// XObject Creation
// =============================================================================

/// Wrap a source page as a Form XObject in `output`.
///
/// The XObject's BBox is the page's (possibly inherited) MediaBox, so drawing
/// it with a `cm` that maps that box onto a cell places the whole page there.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut CopyCache,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let [llx, lly, urx, ury] = page_media_box(source, page_id)?;
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(urx),
            Object::Real(ury),
        ]),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Decoded content of a page; multiple streams are joined with newlines.
pub fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };

    match doc.dereference(contents)?.1 {
        Object::Stream(stream) => Ok(stream_content(stream)),
        Object::Array(arr) => {
            let mut result = Vec::new();
            for obj in arr {
                if let Object::Stream(stream) = doc.dereference(obj)?.1 {
                    result.extend_from_slice(&stream_content(stream));
                    result.push(b'\n');
                }
            }
            Ok(result)
        }
        _ => Ok(Vec::new()),
    }
}

fn stream_content(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// A reference is registered in `cache` before its target is copied, so
/// reference cycles (pages ↔ annotations) terminate and shared objects are
/// copied once. Page tree nodes are never copied here: a page is only
/// reachable through the id reserved for it in `cache`, and any other page or
/// `Pages` node reads as null.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Dangling references are legal and read as null
            let Ok(referenced) = source.get_object(*id) else {
                return Ok(Object::Null);
            };
            if is_page_tree_node(referenced) {
                return Ok(Object::Null);
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

/// `/Type /Page` or `/Type /Pages`
fn is_page_tree_node(obj: &Object) -> bool {
    match obj.as_dict().and_then(|dict| dict.get(b"Type")) {
        Ok(Object::Name(name)) => name == b"Page" || name == b"Pages",
        _ => false,
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, walking up the page tree for inherited values.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut dict = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => dict = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    log::warn!(
        "Page tree deeper than {} levels, giving up on /{}",
        MAX_PAGE_TREE_DEPTH,
        String::from_utf8_lossy(key)
    );
    Ok(None)
}

/// MediaBox of a page as `[llx, lly, urx, ury]`, US Letter when absent
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Result<MediaBox> {
    let default = [0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1];

    let Some(obj) = inherited_attribute(doc, page_id, b"MediaBox")? else {
        return Ok(default);
    };
    let Ok(values) = doc.dereference(obj)?.1.as_array() else {
        return Ok(default);
    };
    if values.len() != 4 {
        return Ok(default);
    }

    let mut media_box = default;
    for (slot, value) in media_box.iter_mut().zip(values) {
        if let Some(n) = extract_number(doc.dereference(value)?.1) {
            *slot = n;
        }
    }
    Ok(media_box)
}

/// Get source page dimensions in points
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    let [llx, lly, urx, ury] = page_media_box(doc, page_id)?;
    Ok(PageSize::new((urx - llx).abs(), (ury - lly).abs()))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
