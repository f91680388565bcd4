//! Ordnance Engine - all server-side code for the guided-weapon catalog.

pub mod api;
pub mod app;
pub mod infrastructure;
