//! Typed models

mod collection;
mod row;
mod value;

pub use collection::*;
pub use row::*;
pub use value::*;
