//! Service-layer orchestration.

pub mod auth;
pub mod oauth;
