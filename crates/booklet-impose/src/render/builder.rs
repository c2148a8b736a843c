//! Output document assembly
//!
//! Every pipeline phase builds a fresh document: pages are appended one at a
//! time and the page tree, catalog and trailer are written by [`finish`].
//!
//! [`finish`]: DocumentBuilder::finish

use crate::constants::OUTPUT_PDF_VERSION;
use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::{CopyCache, copy_object_deep, inherited_attribute};

/// Page attributes a page may inherit from its ancestors
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

pub(crate) struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Document being built, for adding shared objects (fonts, XObjects)
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Allocate output ids for the source pages this phase will copy.
    ///
    /// References to a reserved page (link destinations, annotation `/P`)
    /// resolve to its copy even when they are reached before the page itself.
    pub fn reserve_pages(
        &mut self,
        page_ids: impl IntoIterator<Item = ObjectId>,
        cache: &mut CopyCache,
    ) {
        for page_id in page_ids {
            if !cache.contains_key(&page_id) {
                cache.insert(page_id, self.doc.new_object_id());
            }
        }
    }

    /// Copy one source page with its content and resources.
    ///
    /// Inherited attributes are resolved onto the copy, so it is
    /// self-contained under the new page tree. `cache` must only be shared
    /// between copies from the same source document.
    pub fn copy_page(
        &mut self,
        source: &Document,
        page_id: ObjectId,
        cache: &mut CopyCache,
    ) -> Result<ObjectId> {
        let page = source.get_dictionary(page_id)?;

        let new_id = match cache.get(&page_id) {
            Some(&reserved) if !self.doc.objects.contains_key(&reserved) => reserved,
            _ => {
                let id = self.doc.new_object_id();
                cache.insert(page_id, id);
                id
            }
        };

        let mut dict = Dictionary::new();
        for (key, value) in page.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            dict.set(
                key.clone(),
                copy_object_deep(&mut self.doc, source, value, cache)?,
            );
        }

        for key in INHERITABLE {
            if dict.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page_id, key)? {
                let value = copy_object_deep(&mut self.doc, source, value, cache)?;
                dict.set(key.to_vec(), value);
            }
        }

        self.insert_page(new_id, dict);
        Ok(new_id)
    }

    /// Append a page of the given size with an optional content stream
    pub fn add_blank_page(
        &mut self,
        size: PageSize,
        content: Vec<u8>,
        resources: Dictionary,
    ) -> ObjectId {
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content));

        let mut page_dict = Dictionary::new();
        page_dict.set("MediaBox", media_box(size));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));
        self.add_page(page_dict)
    }

    /// Append a prepared page dictionary
    pub fn add_page(&mut self, page_dict: Dictionary) -> ObjectId {
        let page_id = self.doc.new_object_id();
        self.insert_page(page_id, page_dict);
        page_id
    }

    fn insert_page(&mut self, page_id: ObjectId, mut page_dict: Dictionary) {
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        self.doc.objects.insert(page_id, Object::Dictionary(page_dict));
        self.kids.push(Object::Reference(page_id));
    }

    /// Create pages tree and catalog, finalize document structure
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));

        self.doc.trailer.set("Root", catalog_id);
        self.doc
    }
}

/// `[0 0 w h]` box for a page of the given size
pub(crate) fn media_box(size: PageSize) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(size.width),
        Object::Real(size.height),
    ])
}
