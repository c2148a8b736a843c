//! PDF imposition - arranging pages for booklet printing
//!
//! This module orchestrates the imposition process:
//! 1. Load the source document
//! 2. Optionally stamp running page numbers
//! 3. Pad with blank pages to whole signatures
//! 4. Reorder pages (2-up) or place them on 2×2 sheets (4-up)
//! 5. Serialize the result

mod io;
mod padding;
mod sheet;
mod signature;

pub use io::{load_pdf, load_pdf_bytes, page_count, page_size, pdf_to_bytes, save_pdf};

use crate::layout::plan_imposition;
use crate::options::ImpositionOptions;
use crate::progress::{NoProgress, Phase, ProgressReporter, checkpoint};
use crate::render::number_pages;
use crate::stats::calculate_statistics;
use crate::types::*;
use lopdf::Document;
use std::borrow::Cow;

/// Serialized imposition output with its summary
#[derive(Debug, Clone)]
pub struct ImposedPdf {
    pub bytes: Vec<u8>,
    pub statistics: ImpositionStatistics,
}

/// Main imposition function
pub async fn impose(document: Document, options: &ImpositionOptions) -> Result<Document> {
    options.validate()?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || impose_document(&document, &options, &mut NoProgress))
        .await?
}

/// Parse, impose and serialize a PDF held in memory
pub async fn impose_pdf_bytes<R>(
    bytes: Vec<u8>,
    options: &ImpositionOptions,
    mut reporter: R,
) -> Result<ImposedPdf>
where
    R: ProgressReporter + 'static,
{
    options.validate()?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || impose_bytes_sync(&bytes, &options, &mut reporter)).await?
}

/// Impose a loaded document, reporting each phase to `reporter`
pub fn impose_document<R: ProgressReporter + ?Sized>(
    source: &Document,
    options: &ImpositionOptions,
    reporter: &mut R,
) -> Result<Document> {
    checkpoint(reporter, Phase::Loading, "Loading PDF...")?;
    impose_loaded(source, options, reporter)
}

fn impose_bytes_sync<R: ProgressReporter + ?Sized>(
    bytes: &[u8],
    options: &ImpositionOptions,
    reporter: &mut R,
) -> Result<ImposedPdf> {
    checkpoint(reporter, Phase::Loading, "Loading PDF...")?;
    let source = load_pdf_bytes(bytes)?;
    let source_pages = page_count(&source);

    let mut imposed = impose_loaded(&source, options, reporter)?;

    checkpoint(reporter, Phase::Serializing, "Generating final PDF...")?;
    let bytes = pdf_to_bytes(&mut imposed)?;
    let statistics = calculate_statistics(source_pages, options)?;

    checkpoint(reporter, Phase::Complete, "Complete!")?;
    Ok(ImposedPdf { bytes, statistics })
}

fn impose_loaded<R: ProgressReporter + ?Sized>(
    source: &Document,
    options: &ImpositionOptions,
    reporter: &mut R,
) -> Result<Document> {
    let total_pages = page_count(source);
    if total_pages == 0 {
        return Err(BookletError::EmptyDocument);
    }

    let numbered = if options.page_numbers {
        checkpoint(reporter, Phase::Numbering, "Adding page numbers...")?;
        Cow::Owned(number_pages(source)?)
    } else {
        Cow::Borrowed(source)
    };

    checkpoint(reporter, Phase::Padding, "Adding blank pages...")?;
    let (padded, padding) =
        padding::pad_document(&numbered, options.signature_size, options.page_numbers)?;
    drop(numbered);

    checkpoint(reporter, Phase::Reordering, "Reordering pages...")?;
    let plan = plan_imposition(padding.padded_total, options.layout, options.signature_size)?;
    let output = match options.layout {
        SheetLayout::TwoUp => signature::impose_two_up(&padded, &plan)?,
        SheetLayout::FourUp => sheet::impose_four_up(&padded, &plan)?,
    };

    log::info!(
        "Imposed {} page(s) (+{} blank) into {} output page(s)",
        total_pages,
        padding.blanks_needed,
        plan.output_pages()
    );
    Ok(output)
}
