//! Feature slices for the shell (state + render per slice).

pub mod input;
pub mod queue;
