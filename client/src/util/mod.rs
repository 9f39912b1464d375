//! Browser-side helpers.

#[cfg(feature = "csr")]
pub mod auth;
