//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{format_length, format_phone, strip_html, truncate_string, yes_no};
