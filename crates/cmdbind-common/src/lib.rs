//! Helpers shared by the cmdbind crates: terminal colors and JSON accessors.

#![deny(clippy::all)]

mod color;
mod json_ext;

pub use color::Colors;
pub use color::init as color_init;
pub use json_ext::ValueExt;
