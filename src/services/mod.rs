pub mod cadence;

pub use cadence::CadenceStats;
