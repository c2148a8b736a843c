//! Document I/O operations for imposition

use crate::render::get_page_dimensions;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Parse a PDF held in memory
pub fn load_pdf_bytes(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || load_pdf_bytes(&bytes)).await??;
    log::debug!("Loaded {} ({} pages)", path.display(), page_count(&doc));
    Ok(doc)
}

/// Serialize a document
pub fn pdf_to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Save a document to `path`
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || pdf_to_bytes(&mut doc)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Size of the page at 0-based `index`, `None` when out of range
pub fn page_size(doc: &Document, index: usize) -> Result<Option<PageSize>> {
    match doc.get_pages().into_values().nth(index) {
        Some(page_id) => Ok(Some(get_page_dimensions(doc, page_id)?)),
        None => Ok(None),
    }
}
