//! Client state modules.
//!
//! ARCHITECTURE
//! ============
//! `auth` holds the shared session state and its derived status; `sync` is
//! the only writer of that state.

pub mod auth;
pub mod sync;
