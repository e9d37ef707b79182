//! Outbound adapters implementing the domain ports.

pub mod cache;
pub mod oauth;
pub mod persistence;
