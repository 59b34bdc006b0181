//! Appender implementations

pub mod console;
pub mod multi;
pub mod rotating_file;

pub use console::{ConsoleAppender, SharedBuffer};
pub use multi::MultiAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy};

// Re-export the trait next to its implementations
pub use crate::core::Appender;
