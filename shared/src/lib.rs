//! Shared utilities and common types for ResqLine
//!
//! This crate provides common functionality used across all modules:
//! - Configuration types
//! - Error response structures
//! - Utility functions (phone normalization, OTP input handling)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    ApiConfig, AppConfig, Environment, LogFormat, LoggingConfig, OtpConfig, OtpProvider,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use utils::{otp_input, phone, validation};
