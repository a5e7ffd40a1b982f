//! Loyalty card engine: the punch/redeem state machine.
//!
//! Same three-layer shape as `auth`: domain types, a repository trait with
//! an in-memory mock for tests, and the business service on top. Punch and
//! redeem are applied as single conditional updates in the repository so the
//! invariants hold under concurrency.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::CardService;
