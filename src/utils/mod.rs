// src/utils/mod.rs

//! Parsing helpers shared by all extractors: locale numbers, lenient JSON
//! fields, regex captures and href queries.

pub mod json;
pub mod number;
pub mod text;
pub mod url;
