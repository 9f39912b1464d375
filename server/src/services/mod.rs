//! Auth services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `gateway` is the only module routes talk to. `oauth` and `provider` cover
//! the provider handshake, `session` owns tokens and cookies.

pub mod gateway;
pub mod oauth;
pub mod provider;
pub mod session;
