//! PDF merging
//!
//! Concatenates the pages of several documents into one, keeping each
//! document's internal page order and the caller's document order.

use crate::impose::{load_pdf_bytes, page_count, pdf_to_bytes};
use crate::progress::{Phase, ProgressReporter, checkpoint};
use crate::render::{CopyCache, DocumentBuilder};
use crate::types::*;
use lopdf::{Document, ObjectId};

/// Origin of one output page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEntry {
    /// Index of the source document in caller order
    pub document: usize,
    /// 0-based page index within that document
    pub page: usize,
}

/// Ordered origins of every page in the merged output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub entries: Vec<MergeEntry>,
}

impl MergePlan {
    pub fn total_pages(&self) -> usize {
        self.entries.len()
    }
}

/// Plan a merge of documents with the given page counts
pub fn plan_merge(page_counts: &[usize]) -> Result<MergePlan> {
    if page_counts.len() < 2 {
        return Err(BookletError::InsufficientInputs(page_counts.len()));
    }

    let entries = page_counts
        .iter()
        .enumerate()
        .flat_map(|(document, &count)| (0..count).map(move |page| MergeEntry { document, page }))
        .collect();

    Ok(MergePlan { entries })
}

/// Merge documents in order into a new document
pub fn merge_documents(documents: &[Document]) -> Result<Document> {
    let counts: Vec<usize> = documents.iter().map(page_count).collect();
    let plan = plan_merge(&counts)?;

    let page_ids: Vec<Vec<ObjectId>> = documents
        .iter()
        .map(|doc| doc.get_pages().into_values().collect())
        .collect();
    // Object ids are only unique within one source document
    let mut caches: Vec<CopyCache> = vec![CopyCache::new(); documents.len()];

    let mut builder = DocumentBuilder::new();
    for (ids, cache) in page_ids.iter().zip(caches.iter_mut()) {
        builder.reserve_pages(ids.iter().copied(), cache);
    }
    for entry in &plan.entries {
        let page_id = page_ids[entry.document][entry.page];
        builder.copy_page(&documents[entry.document], page_id, &mut caches[entry.document])?;
    }

    log::info!(
        "Merged {} document(s) into {} page(s)",
        documents.len(),
        plan.total_pages()
    );
    Ok(builder.finish())
}

/// Parse, merge and serialize PDFs held in memory.
///
/// Any input that fails to parse rejects the whole merge.
pub async fn merge_pdf_bytes<R>(inputs: Vec<Vec<u8>>, mut reporter: R) -> Result<Vec<u8>>
where
    R: ProgressReporter + 'static,
{
    if inputs.len() < 2 {
        return Err(BookletError::InsufficientInputs(inputs.len()));
    }

    tokio::task::spawn_blocking(move || merge_bytes_sync(&inputs, &mut reporter)).await?
}

fn merge_bytes_sync<R: ProgressReporter + ?Sized>(
    inputs: &[Vec<u8>],
    reporter: &mut R,
) -> Result<Vec<u8>> {
    checkpoint(reporter, Phase::Loading, format!("Loading {} PDFs...", inputs.len()))?;
    let documents = inputs
        .iter()
        .map(|bytes| load_pdf_bytes(bytes))
        .collect::<Result<Vec<_>>>()?;

    checkpoint(reporter, Phase::Merging, "Merging pages...")?;
    let mut merged = merge_documents(&documents)?;

    checkpoint(reporter, Phase::Serializing, "Generating final PDF...")?;
    let bytes = pdf_to_bytes(&mut merged)?;

    checkpoint(reporter, Phase::Complete, "Complete!")?;
    Ok(bytes)
}
