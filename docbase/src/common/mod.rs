//! Common types shared across the engine: values, paths, sort order and
//! constants.

mod constants;
mod field_path;
mod sort_order;
mod value;

pub use constants::*;
pub use field_path::*;
pub use sort_order::*;
pub use value::*;
