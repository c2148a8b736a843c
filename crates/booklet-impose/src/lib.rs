pub mod constants;
pub mod impose;
pub mod layout;
mod merge;
mod options;
pub mod progress;
pub mod render;
mod stats;
mod types;

pub use impose::{
    ImposedPdf, impose, impose_document, impose_pdf_bytes, load_pdf, load_pdf_bytes, page_count,
    page_size, pdf_to_bytes, save_pdf,
};
pub use layout::{
    ImpositionPlan, PaddingPlan, Pattern, compute_padding, lookup_pattern, plan_imposition,
};
pub use merge::{MergeEntry, MergePlan, merge_documents, merge_pdf_bytes, plan_merge};
pub use options::*;
pub use progress::{Checkpoint, NoProgress, Phase, ProgressReporter, ProgressUpdate};
pub use render::number_pages;
pub use stats::calculate_statistics;
pub use types::*;
