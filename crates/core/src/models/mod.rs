//! Data models for Lodgekit

mod chain;
mod draft;
mod hotel;
mod principal;

pub use chain::*;
pub use draft::*;
pub use hotel::*;
pub use principal::*;
