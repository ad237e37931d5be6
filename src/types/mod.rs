//! Data model for table grids, column targets and formatting rules.

mod catalog;
mod cell;
mod document;
mod formatting;

pub use catalog::*;
pub use cell::*;
pub use document::*;
pub use formatting::*;
