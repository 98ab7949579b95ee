//! Call-request lifecycle engine.
//!
//! Pure domain logic for appointment-scheduling outreach: input validation,
//! fallback script synthesis, readiness scoring, and the call history state
//! machine. The `core` crate has no HTTP or provider dependencies; external
//! collaborators are reached through the ports in [`store`] and
//! [`providers`].

pub mod call;
pub mod error;
pub mod history;
pub mod providers;
pub mod readiness;
pub mod script;
pub mod store;
pub mod types;
pub mod validation;
