//! Tests for the OTP challenge controller
