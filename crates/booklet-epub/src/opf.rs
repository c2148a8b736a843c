//! OPF package descriptor scanning and rewriting
//!
//! The descriptor is streamed through quick-xml twice: once to collect the
//! manifest items and cover metas, once to write it back with edits. Elements
//! that are not edited are written back byte for byte. Element matching uses
//! local names, so prefixed documents (`<opf:item>`) work too.

use crate::types::{EpubError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

pub const COVER_PROPERTY: &str = "cover-image";

/// One `<item>` of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Vec<String>,
}

impl ManifestItem {
    pub fn is_cover(&self) -> bool {
        self.properties.iter().any(|p| p == COVER_PROPERTY)
    }
}

/// What the descriptor declares today
#[derive(Debug, Clone, Default)]
pub struct OpfScan {
    pub items: Vec<ManifestItem>,
    /// `content` of every `<meta name="cover">`, in document order
    pub cover_metas: Vec<String>,
}

impl OpfScan {
    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Collect manifest items and cover metas.
///
/// Fails with a structural error when `<manifest>` or `<metadata>` is absent.
pub fn scan(opf: &str) -> Result<OpfScan> {
    let mut reader = Reader::from_str(opf);
    let mut scan = OpfScan::default();
    let mut depth = Depth::default();
    let (mut seen_manifest, mut seen_metadata) = (false, false);

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"manifest" => seen_manifest = true,
                    b"metadata" => seen_metadata = true,
                    b"item" if depth.manifest > 0 => scan.items.push(read_item(e)?),
                    b"meta" if depth.metadata > 0 => {
                        if let Some(content) = cover_meta_content(e)? {
                            scan.cover_metas.push(content);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        depth.track(&event);
    }

    if !seen_manifest {
        return Err(EpubError::structural("package descriptor has no <manifest>"));
    }
    if !seen_metadata {
        return Err(EpubError::structural("package descriptor has no <metadata>"));
    }
    Ok(scan)
}

/// Edits applied in one pass over the descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEdits {
    pub item_id: String,
    pub href: String,
    pub media_type: String,
    /// Append a new manifest item instead of updating `item_id`
    pub create_item: bool,
    /// Items that lose the cover-image property
    pub strip_property_from: Vec<String>,
    /// Append a new cover meta instead of updating the first one
    pub create_meta: bool,
}

/// Write the descriptor back with `edits` applied
pub fn rewrite(opf: &str, edits: &DescriptorEdits) -> Result<String> {
    let mut reader = Reader::from_str(opf);
    let mut writer = Writer::new(Vec::new());
    let mut depth = Depth::default();

    // Whitespace is held back so it can be dropped along with a removed element
    let mut pending_ws: Option<Event> = None;
    let mut item_indent: Option<String> = None;
    let mut meta_indent: Option<String> = None;
    let mut manifest_prefix = String::new();
    let mut metadata_prefix = String::new();
    let mut cover_metas_seen = 0usize;
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event()?;

        if skip_depth > 0 {
            match &event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        if let Event::Text(text) = &event {
            if is_whitespace(text) {
                if let Some(held) = pending_ws.take() {
                    writer.write_event(held)?;
                }
                pending_ws = Some(event.into_owned());
                continue;
            }
        }

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_start = matches!(event, Event::Start(_));
                let local = e.local_name();
                match local.as_ref() {
                    b"manifest" => {
                        manifest_prefix = prefix_of(e)?;
                        if !is_start && edits.create_item {
                            flush(&mut writer, &mut pending_ws)?;
                            write_expanded(&mut writer, e, new_item(&manifest_prefix, edits))?;
                            continue;
                        }
                    }
                    b"metadata" => {
                        metadata_prefix = prefix_of(e)?;
                        if !is_start && edits.create_meta {
                            flush(&mut writer, &mut pending_ws)?;
                            write_expanded(&mut writer, e, new_meta(&metadata_prefix, edits))?;
                            continue;
                        }
                    }
                    b"item" if depth.manifest > 0 => {
                        item_indent = whitespace_text(&pending_ws)?.or(item_indent);
                        let item = read_item(e)?;
                        if item.id == edits.item_id && !edits.create_item {
                            flush(&mut writer, &mut pending_ws)?;
                            let updated = rewrite_item(e, &item, Some(edits))?;
                            writer.write_event(restyle(&event, updated))?;
                            depth.track(&event);
                            continue;
                        }
                        if edits.strip_property_from.contains(&item.id) {
                            flush(&mut writer, &mut pending_ws)?;
                            let updated = rewrite_item(e, &item, None)?;
                            writer.write_event(restyle(&event, updated))?;
                            depth.track(&event);
                            continue;
                        }
                    }
                    b"meta" if depth.metadata > 0 => {
                        if cover_meta_content(e)?.is_some() {
                            cover_metas_seen += 1;
                            if cover_metas_seen > 1 || edits.create_meta {
                                // Duplicate cover declarations are dropped
                                pending_ws = None;
                                if is_start {
                                    skip_depth = 1;
                                }
                                log::debug!("Dropping duplicate cover meta");
                                continue;
                            }
                            meta_indent = whitespace_text(&pending_ws)?.or(meta_indent);
                            flush(&mut writer, &mut pending_ws)?;
                            let updated = set_attribute(e, "content", &edits.item_id)?;
                            writer.write_event(restyle(&event, updated))?;
                            depth.track(&event);
                            continue;
                        }
                        meta_indent = whitespace_text(&pending_ws)?.or(meta_indent);
                    }
                    _ => {}
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"manifest" if edits.create_item => {
                    let indent = item_indent.clone().unwrap_or_else(|| "\n    ".to_string());
                    writer.write_event(Event::Text(BytesText::from_escaped(indent)))?;
                    writer.write_event(Event::Empty(new_item(&manifest_prefix, edits)))?;
                }
                b"metadata" if edits.create_meta => {
                    let indent = meta_indent.clone().unwrap_or_else(|| "\n    ".to_string());
                    writer.write_event(Event::Text(BytesText::from_escaped(indent)))?;
                    writer.write_event(Event::Empty(new_meta(&metadata_prefix, edits)))?;
                }
                _ => {}
            },
            Event::Eof => {
                flush(&mut writer, &mut pending_ws)?;
                break;
            }
            _ => {}
        }

        flush(&mut writer, &mut pending_ws)?;
        depth.track(&event);
        writer.write_event(event)?;
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

// =============================================================================
// Element helpers
// =============================================================================

/// Nesting inside `<manifest>` and `<metadata>`
#[derive(Debug, Default)]
struct Depth {
    manifest: usize,
    metadata: usize,
}

impl Depth {
    fn track(&mut self, event: &Event) {
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"manifest" => self.manifest += 1,
                b"metadata" => self.metadata += 1,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"manifest" => self.manifest = self.manifest.saturating_sub(1),
                b"metadata" => self.metadata = self.metadata.saturating_sub(1),
                _ => {}
            },
            _ => {}
        }
    }
}

/// (raw key, local key, unescaped value) for every attribute
fn attributes(e: &BytesStart) -> Result<Vec<(String, String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let local = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            Ok((key, local, value))
        })
        .collect()
}

fn attribute(e: &BytesStart, local: &str) -> Result<Option<String>> {
    Ok(attributes(e)?
        .into_iter()
        .find(|(_, key, _)| key == local)
        .map(|(_, _, value)| value))
}

fn read_item(e: &BytesStart) -> Result<ManifestItem> {
    let mut item = ManifestItem {
        id: String::new(),
        href: String::new(),
        media_type: String::new(),
        properties: Vec::new(),
    };
    for (_, local, value) in attributes(e)? {
        match local.as_str() {
            "id" => item.id = value,
            "href" => item.href = value,
            "media-type" => item.media_type = value,
            "properties" => {
                item.properties = value.split_whitespace().map(str::to_string).collect()
            }
            _ => {}
        }
    }
    Ok(item)
}

/// `content` of a `<meta name="cover">`, `None` for any other meta
fn cover_meta_content(e: &BytesStart) -> Result<Option<String>> {
    if attribute(e, "name")?.as_deref() != Some("cover") {
        return Ok(None);
    }
    Ok(Some(attribute(e, "content")?.unwrap_or_default()))
}

/// Copy of `e` with attributes replaced by `updates`, keeping attribute order.
///
/// An update of `None` removes the attribute; updates for attributes `e`
/// lacks are appended.
fn with_attributes(
    e: &BytesStart,
    updates: &[(&str, Option<String>)],
) -> Result<BytesStart<'static>> {
    let mut out = e.clone().into_owned();
    out.clear_attributes();

    let mut applied = vec![false; updates.len()];
    for (key, local, value) in attributes(e)? {
        match updates.iter().position(|(name, _)| *name == local) {
            Some(idx) => {
                applied[idx] = true;
                if let Some(new_value) = &updates[idx].1 {
                    out.push_attribute((key.as_str(), new_value.as_str()));
                }
            }
            None => out.push_attribute((key.as_str(), value.as_str())),
        }
    }
    for ((name, value), done) in updates.iter().zip(applied) {
        if let (false, Some(value)) = (done, value) {
            out.push_attribute((*name, value.as_str()));
        }
    }
    Ok(out)
}

fn set_attribute(e: &BytesStart, local: &str, value: &str) -> Result<BytesStart<'static>> {
    with_attributes(e, &[(local, Some(value.to_string()))])
}

/// Rewrite an item: point it at the new cover (`edits`) or strip its cover property
fn rewrite_item(
    e: &BytesStart,
    item: &ManifestItem,
    edits: Option<&DescriptorEdits>,
) -> Result<BytesStart<'static>> {
    let mut properties: Vec<&str> = item
        .properties
        .iter()
        .map(String::as_str)
        .filter(|p| *p != COVER_PROPERTY)
        .collect();

    match edits {
        Some(edits) => {
            properties.push(COVER_PROPERTY);
            with_attributes(
                e,
                &[
                    ("href", Some(edits.href.clone())),
                    ("media-type", Some(edits.media_type.clone())),
                    ("properties", Some(properties.join(" "))),
                ],
            )
        }
        None => {
            let properties = (!properties.is_empty()).then(|| properties.join(" "));
            with_attributes(e, &[("properties", properties)])
        }
    }
}

fn new_item(prefix: &str, edits: &DescriptorEdits) -> BytesStart<'static> {
    let mut item = BytesStart::new(format!("{}item", prefix));
    item.push_attribute(("id", edits.item_id.as_str()));
    item.push_attribute(("href", edits.href.as_str()));
    item.push_attribute(("media-type", edits.media_type.as_str()));
    item.push_attribute(("properties", COVER_PROPERTY));
    item
}

fn new_meta(prefix: &str, edits: &DescriptorEdits) -> BytesStart<'static> {
    let mut meta = BytesStart::new(format!("{}meta", prefix));
    meta.push_attribute(("name", "cover"));
    meta.push_attribute(("content", edits.item_id.as_str()));
    meta
}

/// Write an empty `<parent/>` as `<parent><child/></parent>`
fn write_expanded(
    writer: &mut Writer<Vec<u8>>,
    parent: &BytesStart,
    child: BytesStart,
) -> Result<()> {
    let name = std::str::from_utf8(parent.name().as_ref())?.to_string();
    writer.write_event(Event::Start(parent.clone().into_owned()))?;
    writer.write_event(Event::Empty(child))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Same event kind as `original`, carrying `element`
fn restyle<'a>(original: &Event, element: BytesStart<'a>) -> Event<'a> {
    match original {
        Event::Start(_) => Event::Start(element),
        _ => Event::Empty(element),
    }
}

/// `"opf:"` for `<opf:manifest>`, empty when unprefixed
fn prefix_of(e: &BytesStart) -> Result<String> {
    match e.name().prefix() {
        Some(prefix) => Ok(format!("{}:", std::str::from_utf8(prefix.as_ref())?)),
        None => Ok(String::new()),
    }
}

fn is_whitespace(text: &BytesText) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn whitespace_text(pending: &Option<Event>) -> Result<Option<String>> {
    match pending {
        Some(Event::Text(text)) => Ok(Some(std::str::from_utf8(text)?.to_string())),
        _ => Ok(None),
    }
}

fn flush(writer: &mut Writer<Vec<u8>>, pending: &mut Option<Event>) -> Result<()> {
    if let Some(held) = pending.take() {
        writer.write_event(held)?;
    }
    Ok(())
}
