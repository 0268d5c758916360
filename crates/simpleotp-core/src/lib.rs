//! Shared plumbing for SimpleOtp services: tracing setup, HTTP middleware,
//! health probes and serialization helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
