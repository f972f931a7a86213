//! Type-ahead messages waiting for the current turn to finish.

mod render;
mod state;

pub use render::render_queue_preview;
pub use state::PendingQueue;
