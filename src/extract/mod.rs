// src/extract/mod.rs

//! Pure text extractors. No I/O here: every function maps scraped text to a
//! candidate value for one attribute.

pub mod email;
pub mod phone;
pub mod text;
