use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpubError {
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed publication: {0}")]
    Structural(String),
    #[error("Cover image is empty")]
    EmptyImage,
    #[error("Unsupported compression level: {0} (expected 0-9)")]
    CompressionLevel(i64),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EpubError>;

/// Coarse classification a caller can use to guide the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive or one of its documents could not be parsed
    BadInput,
    /// The archive parses but lacks an entry or element it must have
    Structural,
    /// The request itself is unusable (empty image, bad level)
    Precondition,
    /// Runtime failure unrelated to the input
    Internal,
}

impl EpubError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EpubError::Zip(_) | EpubError::Xml(_) | EpubError::Utf8(_) | EpubError::Io(_) => {
                ErrorKind::BadInput
            }
            EpubError::Structural(_) => ErrorKind::Structural,
            EpubError::EmptyImage | EpubError::CompressionLevel(_) => ErrorKind::Precondition,
            EpubError::TaskJoin(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        EpubError::Structural(msg.into())
    }
}

impl From<quick_xml::events::attributes::AttrError> for EpubError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        EpubError::Xml(quick_xml::Error::InvalidAttr(err))
    }
}

impl From<std::string::FromUtf8Error> for EpubError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EpubError::Utf8(err.utf8_error())
    }
}
