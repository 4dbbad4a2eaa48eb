//! Shared helpers for response post-processing.

pub mod code;
pub mod json_extraction;

pub use code::{looks_like_code, strip_code_fences};
pub use json_extraction::extract_json_object;
