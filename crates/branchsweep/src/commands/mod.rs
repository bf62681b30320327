//! Command implementations

pub mod sweep;

pub use sweep::run_sweep;
