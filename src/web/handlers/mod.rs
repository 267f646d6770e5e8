//! API handlers.

pub mod contact;

pub use contact::*;
