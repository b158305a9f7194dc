//! # storefront_core
//!
//! Core domain logic for the Storefront auth service: token codec,
//! password hashing, refresh-token ledger, OAuth2 account bridging and
//! credential-store queries, shared by `storefront_api`.

pub mod auth;
pub mod migrate;
pub mod models;
