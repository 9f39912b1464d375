//! Network layer: wire types and the browser HTTP transport.

pub mod api;
pub mod types;
