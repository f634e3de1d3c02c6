//! Shared types for the Kotoba diary service.
//!
//! Kept free of storage and HTTP concerns so every crate in the workspace
//! (store, core, api) can agree on the same shapes.

pub mod api;
pub mod events;
pub mod models;
