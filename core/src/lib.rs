//! # ResqLine Core
//!
//! Domain layer for ResqLine phone verification. This crate contains the OTP
//! challenge controller shared by the login, sign-up and phone-change screens,
//! the collaborator traits it depends on, and the error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
