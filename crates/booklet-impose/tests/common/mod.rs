#![allow(dead_code)]

use booklet_impose::render::get_page_content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Document whose pages draw the label `(Page-N)`, N starting at 1
pub fn create_test_pdf(num_pages: usize) -> Document {
    create_sized_pdf(&vec![(612.0, 792.0); num_pages])
}

/// Labelled document with one page per entry of `sizes`
pub fn create_sized_pdf(sizes: &[(f32, f32)]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let content = format!("BT (Page-{}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// First `Page-N` label in `content`, `None` for a blank page
pub fn label_in(content: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(content);
    let start = text.find("(Page-")? + "(Page-".len();
    let end = start + text[start..].find(')')?;
    text[start..end].parse().ok()
}

/// Source label of every output page (2-up output)
pub fn page_labels(doc: &Document) -> Vec<Option<usize>> {
    page_ids(doc)
        .into_iter()
        .map(|id| {
            let dict = doc.get_dictionary(id).unwrap();
            label_in(&get_page_content(doc, dict).unwrap())
        })
        .collect()
}

/// Source labels drawn on one 4-up sheet, in drawing order
pub fn sheet_labels(doc: &Document, sheet_id: ObjectId) -> Vec<Option<usize>> {
    let dict = doc.get_dictionary(sheet_id).unwrap();
    let content = String::from_utf8(get_page_content(doc, dict).unwrap()).unwrap();
    let xobjects = dict
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap();

    content
        .split_whitespace()
        .filter(|token| token.starts_with("/P"))
        .map(|name| {
            let id = xobjects
                .get(name[1..].as_bytes())
                .unwrap()
                .as_reference()
                .unwrap();
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            label_in(&stream.content)
        })
        .collect()
}

/// The `cm` operands drawn before each XObject on a sheet
pub fn sheet_matrices(doc: &Document, sheet_id: ObjectId) -> Vec<[f32; 6]> {
    let dict = doc.get_dictionary(sheet_id).unwrap();
    let content = String::from_utf8(get_page_content(doc, dict).unwrap()).unwrap();
    content
        .lines()
        .filter(|line| line.contains(" cm "))
        .map(|line| {
            let nums: Vec<f32> = line
                .split_whitespace()
                .skip(1)
                .take(6)
                .map(|n| n.parse().unwrap())
                .collect();
            [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]]
        })
        .collect()
}

/// Give page `from` (0-based) a link annotation whose destination is page `to`
pub fn add_page_link(doc: &mut Document, from: usize, to: usize) {
    let ids = page_ids(doc);
    let link_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        ("P", Object::Reference(ids[from])),
        (
            "Dest",
            Object::Array(vec![
                Object::Reference(ids[to]),
                Object::Name(b"Fit".to_vec()),
            ]),
        ),
    ]));
    doc.get_dictionary_mut(ids[from])
        .unwrap()
        .set("Annots", Object::Array(vec![Object::Reference(link_id)]));
}

/// Destination page of every link annotation, in page order
pub fn link_destinations(doc: &Document) -> Vec<ObjectId> {
    page_ids(doc)
        .into_iter()
        .filter_map(|id| doc.get_dictionary(id).unwrap().get(b"Annots").ok())
        .flat_map(|annots| annots.as_array().unwrap().clone())
        .map(|annot| {
            let annot = doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
            annot.get(b"Dest").unwrap().as_array().unwrap()[0]
                .as_reference()
                .unwrap()
        })
        .collect()
}

/// Number of `/Type /Page` objects anywhere in the file
pub fn page_object_count(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter(|obj| {
            obj.as_dict()
                .and_then(|dict| dict.get(b"Type"))
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Page")
        })
        .count()
}

/// Source label of an output page
pub fn label_of(doc: &Document, page_id: ObjectId) -> Option<usize> {
    let dict = doc.get_dictionary(page_id).unwrap();
    label_in(&get_page_content(doc, dict).unwrap())
}
