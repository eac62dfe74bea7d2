//! URL handling module for Topic-Sieve
//!
//! Input URLs are taken mostly as written. The only rewrite is adding a
//! missing scheme; the fetcher then checks the result is something it can
//! request.

mod normalize;

// Re-export main functions
pub use normalize::{ensure_scheme, has_scheme, parse_fetchable, DEFAULT_SCHEME_PREFIX};
