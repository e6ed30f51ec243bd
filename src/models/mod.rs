//! Request and result models

pub mod features;
pub mod patient;
pub mod prediction;

pub use features::*;
pub use patient::*;
pub use prediction::*;
