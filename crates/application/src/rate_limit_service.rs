//! Per-identity attempt throttling with escalating lockout.
//!
//! Each scope allows a small number of attempts inside a sliding window.
//! Exceeding it locks the identity out for a fixed period; the lockout is
//! not extended by further requests. The read-modify-write of an attempt
//! record runs atomically inside the [`ThrottleStore`] adapter.

mod config;
mod policy;
mod ports;
mod service;


pub use config::{ThrottlePolicy, ThrottleScope};
pub use policy::{AttemptEvaluation, AttemptRecord, ThrottleDecision, evaluate_attempt};
pub use ports::ThrottleStore;
pub use service::RateLimitService;
