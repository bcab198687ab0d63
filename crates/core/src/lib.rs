//! Commerce Discounts Core - Shared types library.
//!
//! This crate provides the types used across all Commerce Discounts components:
//! - `provider` - Resource adapter, commercetools client, schema and diffing
//! - `cli` - Command-line host that validates, plans and applies configurations
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Every type here serializes to the exact JSON shape the commercetools HTTP
//! API expects, so the provider crate can send and receive them directly.
//!
//! # Modules
//!
//! - [`types`] - IDs, localized strings, money, discount values, drafts and update actions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
