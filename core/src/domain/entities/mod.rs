//! Domain entities representing core business objects.

pub mod otp_digits;

pub use otp_digits::{OtpDigits, CODE_LENGTH};
