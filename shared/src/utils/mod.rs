//! Common utility functions

pub mod otp_input;
pub mod phone;
pub mod validation;

// Re-export commonly used utilities
pub use otp_input::*;
pub use phone::*;
pub use validation::*;
