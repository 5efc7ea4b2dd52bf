//! Types that make up a compiled schema document.

mod document;
mod entity;
mod field;
mod types;

pub use document::*;
pub use entity::*;
pub use field::*;
pub use types::*;
