//! PDF rendering modules for imposition
//!
//! This module handles all PDF-specific operations:
//! - Assembling output documents page by page
//! - Creating XObjects from source pages
//! - Deep copying PDF objects between documents
//! - Stamping page numbers

mod builder;
mod numbering;
mod xobject;

pub(crate) use builder::{DocumentBuilder, media_box};
pub(crate) use numbering::{add_number_font, number_font_resources, page_number_ops};
pub use numbering::number_pages;
pub use xobject::{
    CopyCache, copy_object_deep, create_page_xobject, get_page_content, get_page_dimensions,
    inherited_attribute, page_media_box,
};
