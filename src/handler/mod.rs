//! Request handler module
//!
//! Connects the rewrite middleware and the asset router to hyper.

pub mod pipeline;
mod state;

pub use pipeline::handle_request;
pub use state::AppState;
