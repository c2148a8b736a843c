pub mod archive;
pub mod container;
mod cover;
pub mod opf;
mod types;

pub use archive::{DEFAULT_COMPRESSION_LEVEL, EpubArchive};
pub use cover::*;
pub use types::*;
