//! Result sinks
//!
//! - `text`: the `word: count` table and elapsed time on stdout
//! - `json`: a structured report file

pub mod json;
pub mod text;
