//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Vendor registration, login and profile updates live here, together with
//! the token service that signs and validates bearer tokens.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
pub use token::TokenService;
