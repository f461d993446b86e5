//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **ActionType**: create/remove selector carried by every social action

mod action_type;

pub use action_type::*;
