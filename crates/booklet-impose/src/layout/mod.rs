//! Layout calculation modules for imposition
//!
//! This module handles the page-order and geometry side of imposition:
//! - Signature patterns (which logical page goes in which physical slot)
//! - Padding to whole signatures
//! - Whole-document plans and 4-up grid placement

mod grid;
mod padding;
mod placement;
mod plan;
mod signature;
mod types;

pub use grid::*;
pub use padding::*;
pub use placement::*;
pub use plan::*;
pub use signature::*;
pub use types::*;
