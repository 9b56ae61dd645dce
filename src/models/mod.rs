// src/models/mod.rs

//! Data models and configuration.

mod company;
mod config;

pub use company::{Company, NOT_FOUND, Phase, is_present};
pub use config::{BackendConfig, Config, HttpConfig, PacingConfig, PathsConfig};
