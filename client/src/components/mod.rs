//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render whatever the shared `AuthState` context says and route
//! user actions back through the session synchronizer.

pub mod auth_status;
