//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - User configuration (`config.json` in the config directory)
//! - [`encoding`] - Little-endian integer and slice codecs for table files
//! - [`progress`] - Progress bar shim over `indicatif`

pub mod app_data;
pub mod encoding;
pub mod progress;

pub use app_data::*;
pub use encoding::*;
pub use progress::*;
