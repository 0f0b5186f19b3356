//! Core data models for rank lookups.

mod identity;
mod rank;
mod region;

pub use identity::*;
pub use rank::*;
pub use region::*;
