//! Entry points for the presentation shell.
//!
//! - [`run`]: Convert a batch with progress and completion callbacks
//! - [`convert_image`]: Convert a single image

mod convert;

pub use convert::*;
