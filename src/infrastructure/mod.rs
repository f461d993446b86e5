//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool, migrations and transactions (PostgreSQL)
//! - Repository implementations of the domain store traits
//! - ffprobe/ffmpeg media probing
//! - Prometheus metrics

pub mod database;
pub mod media;
pub mod metrics;
pub mod repositories;
