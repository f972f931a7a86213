//! The line being composed and its live rendering.

mod render;
mod state;

pub use render::{CURSOR, LiveFrame, LiveView, render_input};
pub use state::InputBuffer;
