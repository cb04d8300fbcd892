//! Request handlers.

pub mod edits;
pub mod health;
pub mod templates;
pub mod videos;

pub use edits::*;
pub use health::*;
pub use templates::*;
pub use videos::*;
