use crate::progress::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported signature size: {0} (expected 4, 8, 16 or 32)")]
    UnsupportedSignature(usize),
    #[error("Invalid sheet layout: {0} pages per sheet (expected 2 or 4)")]
    InvalidLayout(usize),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("No pages to impose")]
    EmptyDocument,
    #[error("Merging needs at least 2 documents, got {0}")]
    InsufficientInputs(usize),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Cancelled before {0}")]
    Cancelled(Phase),
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Coarse classification a caller can use to guide the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input document could not be read
    BadInput,
    /// The requested layout or signature size is not supported
    UnsupportedConfiguration,
    /// The input is well formed but unusable (empty, too few documents)
    Precondition,
    /// The caller stopped the operation at a checkpoint
    Cancelled,
    /// Runtime failure unrelated to the input
    Internal,
}

impl BookletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookletError::Pdf(_) | BookletError::Io(_) => ErrorKind::BadInput,
            BookletError::UnsupportedSignature(_)
            | BookletError::InvalidLayout(_)
            | BookletError::Config(_) => ErrorKind::UnsupportedConfiguration,
            BookletError::EmptyDocument | BookletError::InsufficientInputs(_) => {
                ErrorKind::Precondition
            }
            BookletError::Cancelled(_) => ErrorKind::Cancelled,
            BookletError::TaskJoin(_) => ErrorKind::Internal,
        }
    }
}

/// How many logical pages land on one face of a printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SheetLayout {
    /// One page per output page, folded in half after duplex printing
    #[default]
    TwoUp,
    /// 2×2 grid per output page, cut horizontally before folding
    FourUp,
}

impl SheetLayout {
    /// Logical pages placed on one output page
    pub fn pages_per_sheet(self) -> usize {
        match self {
            SheetLayout::TwoUp => 1,
            SheetLayout::FourUp => 4,
        }
    }

    /// The "pages per sheet" number users pick (2 or 4)
    pub fn up(self) -> usize {
        match self {
            SheetLayout::TwoUp => 2,
            SheetLayout::FourUp => 4,
        }
    }
}

impl TryFrom<usize> for SheetLayout {
    type Error = BookletError;

    fn try_from(up: usize) -> Result<Self> {
        match up {
            2 => Ok(SheetLayout::TwoUp),
            4 => Ok(SheetLayout::FourUp),
            other => Err(BookletError::InvalidLayout(other)),
        }
    }
}

/// Pages per folded signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SignatureSize {
    Four,
    Eight,
    #[default]
    Sixteen,
    ThirtyTwo,
}

impl SignatureSize {
    pub const ALL: [SignatureSize; 4] = [
        SignatureSize::Four,
        SignatureSize::Eight,
        SignatureSize::Sixteen,
        SignatureSize::ThirtyTwo,
    ];

    pub fn pages(self) -> usize {
        match self {
            SignatureSize::Four => 4,
            SignatureSize::Eight => 8,
            SignatureSize::Sixteen => 16,
            SignatureSize::ThirtyTwo => 32,
        }
    }

    /// Largest supported size that the document fills at least once.
    ///
    /// Returns `None` for documents shorter than the smallest signature.
    pub fn suggest(total_pages: usize) -> Option<SignatureSize> {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|size| total_pages >= size.pages())
    }
}

impl TryFrom<usize> for SignatureSize {
    type Error = BookletError;

    fn try_from(pages: usize) -> Result<Self> {
        match pages {
            4 => Ok(SignatureSize::Four),
            8 => Ok(SignatureSize::Eight),
            16 => Ok(SignatureSize::Sixteen),
            32 => Ok(SignatureSize::ThirtyTwo),
            other => Err(BookletError::UnsupportedSignature(other)),
        }
    }
}

/// Page dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Pages in the input document
    pub source_pages: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
    /// Page count after padding
    pub padded_pages: usize,
    /// Number of signatures
    pub signatures: usize,
    /// Output page count
    pub output_pages: usize,
    /// Logical pages on each output page
    pub pages_per_output_page: usize,
}
