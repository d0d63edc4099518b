//! State structures for the adaptive market maker

pub mod config;
pub mod pool;

pub use config::*;
pub use pool::*;
