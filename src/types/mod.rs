//! Type definitions for calheat

mod error;
mod options;
mod value;

pub use error::*;
pub use options::*;
pub use value::*;
