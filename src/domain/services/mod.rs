//! # Domain Services
//!
//! Contracts for collaborators that sit outside the stores.
//!
//! - **MediaProbe**: container inspection and first-frame extraction

mod media_probe;

pub use media_probe::*;
