// src/services/mod.rs

//! Network-facing services: the source client and the per-attribute
//! resolvers that compose it with the pure extractors.

mod email;
mod phone;
mod source;
mod website;

pub use email::EmailResolver;
pub use phone::PhoneResolver;
pub use source::{RemoteSource, SearchHit, SourceClient};
pub use website::WebsiteResolver;

/// Contact-page path suffixes tried in order when the homepage yields
/// nothing.
pub const CONTACT_PATHS: [&str; 4] = ["/contact", "/kontakt", "/about", "/over-ons"];
