pub mod event;
pub mod team;

pub use event::EventRepository;
pub use team::TeamRepository;
