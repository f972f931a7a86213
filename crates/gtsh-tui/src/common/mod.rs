//! Shared helpers for rendering.

pub mod text;
