//! Utility functions for input masking and string formatting.

pub mod format;

pub use format::{mask_phone, mask_zip, truncate_string};
