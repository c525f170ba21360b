pub mod event;
pub mod team;

// Re-export all models for easy importing
pub use event::*;
pub use team::*;
