//! Pure data structures exchanged between the host and the engine.

pub mod progress;
pub mod request;
pub mod resource;

pub use progress::*;
pub use request::*;
pub use resource::*;
