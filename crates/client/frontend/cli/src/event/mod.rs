//! Event handling for the CLI client.
//!
//! The loop multiplexes two sources: the frame tick (input, animation,
//! drawing) and the reply to the single outstanding engine request.

mod handlers;
mod r#loop;

pub use r#loop::EventLoop;
