pub mod events;
pub mod health;
pub mod shared;
pub mod teams;
