//! HTTP API Tests

mod auth_tests;
mod health_tests;
mod message_tests;
mod social_tests;
