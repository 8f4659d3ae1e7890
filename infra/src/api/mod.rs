//! ResqLine backend API access

pub mod client;

pub use client::{ApiClient, ApiReply};
