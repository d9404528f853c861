//! Firebase Cloud Messaging (HTTP v1) push transport.

pub mod client;
pub mod credentials;
mod endpoints;

pub use client::{FcmClient, push_transport};
pub use credentials::ServiceAccount;
