//! Cover replacement
//!
//! Planning reads the descriptor and decides every edit up front; applying
//! rewrites the descriptor once, stores the image and removes the asset the
//! cover item pointed at before, if nothing else still uses it.

use crate::archive::EpubArchive;
use crate::container::descriptor_path;
use crate::opf::{self, DescriptorEdits, OpfScan};
use crate::types::{EpubError, Result};

const COVER_ITEM_ID: &str = "cover-image";
const COVER_DIR: &str = "images";
const COVER_STEM: &str = "cover";

/// New cover image bytes and their declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    pub media_type: String,
}

impl CoverImage {
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: media_type.into(),
        }
    }

    /// Declared type lowercased, without parameters, `image/jpg` spelled `image/jpeg`
    pub fn normalized_media_type(&self) -> String {
        normalize_media_type(&self.media_type)
    }

    /// File extension (with dot) for the stored asset
    pub fn extension(&self) -> &'static str {
        extension_for_media_type(&self.media_type)
    }
}

pub fn normalize_media_type(media_type: &str) -> String {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        _ => essence,
    }
}

/// `.jpg`, `.png`, `.gif` or `.webp`; anything unrecognised is stored as `.jpg`
pub fn extension_for_media_type(media_type: &str) -> &'static str {
    let normalized = normalize_media_type(media_type);
    match normalized.rsplit('/').next().unwrap_or_default() {
        "jpeg" | "jpg" => ".jpg",
        "png" => ".png",
        "gif" => ".gif",
        "webp" => ".webp",
        _ => ".jpg",
    }
}

/// Media type for a file extension (with or without dot)
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// How an element reaches its final state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Create,
    Update,
}

/// Every change a cover replacement makes to one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverReplacementEdit {
    /// Archive path of the package descriptor
    pub descriptor_path: String,
    /// Archive path the image is written to
    pub asset_path: String,
    /// `href` of the cover item, relative to the descriptor
    pub href: String,
    pub media_type: String,
    pub item_id: String,
    pub manifest_action: EditAction,
    pub meta_action: EditAction,
    /// Items whose `cover-image` property is removed
    pub strip_property_from: Vec<String>,
    /// Extra `<meta name="cover">` elements dropped
    pub duplicate_metas: usize,
    /// Previous cover asset removed from the archive
    pub stale_asset: Option<String>,
}

impl CoverReplacementEdit {
    fn descriptor_edits(&self) -> DescriptorEdits {
        DescriptorEdits {
            item_id: self.item_id.clone(),
            href: self.href.clone(),
            media_type: self.media_type.clone(),
            create_item: self.manifest_action == EditAction::Create,
            strip_property_from: self.strip_property_from.clone(),
            create_meta: self.meta_action == EditAction::Create,
        }
    }
}

/// Work out the edits that make `image` the publication's only cover
pub fn plan_cover_replacement(
    archive: &EpubArchive,
    image: &CoverImage,
) -> Result<CoverReplacementEdit> {
    if image.data.is_empty() {
        return Err(EpubError::EmptyImage);
    }

    let descriptor_path = descriptor_path(archive)?;
    let opf_text = archive
        .read_text(&descriptor_path)?
        .ok_or_else(|| EpubError::structural(format!("missing {}", descriptor_path)))?;
    let scan = opf::scan(&opf_text)?;

    let opf_dir = parent_dir(&descriptor_path);
    let href = format!("{}/{}{}", COVER_DIR, COVER_STEM, image.extension());
    let asset_path = join_path(opf_dir, &href);

    let existing = find_cover_item(&scan, opf_dir, &asset_path);
    let (item_id, manifest_action) = match existing {
        Some(item) => (item.id.clone(), EditAction::Update),
        None => (free_item_id(&scan), EditAction::Create),
    };

    let strip_property_from = scan
        .items
        .iter()
        .filter(|item| item.is_cover() && item.id != item_id)
        .map(|item| item.id.clone())
        .collect();

    let stale_asset = existing
        .map(|item| join_path(opf_dir, &item.href))
        .filter(|old| *old != asset_path && archive.contains(old))
        .filter(|old| {
            // Another item may still point at the same file
            !scan
                .items
                .iter()
                .any(|other| other.id != item_id && join_path(opf_dir, &other.href) == *old)
        })
        .filter(|old| !mentioned_elsewhere(archive, &descriptor_path, old));

    let meta_action = if scan.cover_metas.is_empty() {
        EditAction::Create
    } else {
        EditAction::Update
    };

    let edit = CoverReplacementEdit {
        descriptor_path,
        asset_path,
        href,
        media_type: image.normalized_media_type(),
        item_id,
        manifest_action,
        meta_action,
        strip_property_from,
        duplicate_metas: scan.cover_metas.len().saturating_sub(1),
        stale_asset,
    };
    log::debug!("Planned cover replacement: {:?}", edit);
    Ok(edit)
}

/// Apply a planned replacement to the archive
pub fn apply_cover_replacement(
    archive: &mut EpubArchive,
    edit: &CoverReplacementEdit,
    image: &CoverImage,
) -> Result<()> {
    let opf_text = archive
        .read_text(&edit.descriptor_path)?
        .ok_or_else(|| EpubError::structural(format!("missing {}", edit.descriptor_path)))?;
    let rewritten = opf::rewrite(&opf_text, &edit.descriptor_edits())?;

    archive.write_entry(&edit.descriptor_path, rewritten.into_bytes());
    archive.write_entry(&edit.asset_path, image.data.clone());
    if let Some(stale) = &edit.stale_asset {
        archive.remove_entry(stale);
        log::debug!("Removed previous cover asset {}", stale);
    }
    Ok(())
}

/// Replace the cover of an EPUB held in memory
pub fn replace_cover(bytes: &[u8], image: &CoverImage, compression_level: i64) -> Result<Vec<u8>> {
    let mut archive = EpubArchive::open(bytes)?;
    let edit = plan_cover_replacement(&archive, image)?;
    apply_cover_replacement(&mut archive, &edit, image)?;

    log::info!(
        "Cover set to {} ({}, {} bytes)",
        edit.asset_path,
        edit.media_type,
        image.data.len()
    );
    archive.to_bytes(compression_level)
}

/// [`replace_cover`] on the blocking thread pool
pub async fn replace_cover_async(
    bytes: Vec<u8>,
    image: CoverImage,
    compression_level: i64,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || replace_cover(&bytes, &image, compression_level)).await?
}

// =============================================================================
// Helpers
// =============================================================================

/// The item currently acting as cover: by property, then by cover meta, then
/// any item whose href already resolves to the target asset
fn find_cover_item<'a>(
    scan: &'a OpfScan,
    opf_dir: &str,
    asset_path: &str,
) -> Option<&'a opf::ManifestItem> {
    scan.items
        .iter()
        .find(|item| item.is_cover())
        .or_else(|| scan.cover_metas.iter().find_map(|id| scan.item(id)))
        .or_else(|| {
            scan.items
                .iter()
                .find(|item| join_path(opf_dir, &item.href) == asset_path)
        })
}

/// Whether a text entry other than the descriptor names the asset's file.
///
/// Content documents refer to images by paths relative to themselves, so the
/// file name is matched rather than the resolved path.
fn mentioned_elsewhere(archive: &EpubArchive, descriptor_path: &str, asset_path: &str) -> bool {
    let file_name = asset_path.rsplit('/').next().unwrap_or(asset_path).as_bytes();
    if file_name.is_empty() {
        return false;
    }
    archive
        .entry_names()
        .filter(|name| *name != descriptor_path && *name != asset_path)
        .filter_map(|name| archive.read_entry(name))
        .filter(|data| std::str::from_utf8(data).is_ok())
        .any(|data| data.windows(file_name.len()).any(|window| window == file_name))
}

/// `cover-image`, or `cover-image-N` when taken
fn free_item_id(scan: &OpfScan) -> String {
    if scan.item(COVER_ITEM_ID).is_none() {
        return COVER_ITEM_ID.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", COVER_ITEM_ID, n))
        .find(|id| scan.item(id).is_none())
        .unwrap_or_else(|| COVER_ITEM_ID.to_string())
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve `href` against `dir`, folding `.` and `..` segments
fn join_path(dir: &str, href: &str) -> String {
    let href = href.split(['#', '?']).next().unwrap_or_default();
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
