//! # Domain Layer
//!
//! The domain layer contains the core business types of the short-video
//! platform. It is independent of any external frameworks or infrastructure
//! concerns.
//!
//! ## Structure
//!
//! - **entities**: Accounts, videos, comments, messages and the repository
//!   traits for every store (including the follow and favorite graphs)
//! - **value_objects**: Immutable value types (ActionType)
//! - **services**: Contracts for external collaborators (MediaProbe)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Counter cascades are the repositories' responsibility and are atomic

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
