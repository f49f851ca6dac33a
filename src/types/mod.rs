//! Type definitions for ipotrack

mod error;
mod market;

pub use error::*;
pub use market::*;
