// src/lib.rs

//! Company enrichment pipeline library.

pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
