//! Commerce Discounts provider library.
//!
//! A declarative `product_discount` resource backed by the commercetools
//! HTTP API: schema and validation, expand / flatten between configuration
//! and wire shapes, change detection, and the create / read / update /
//! delete adapter over an injected [`client::ProductDiscountApi`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod resource;
pub mod schema;

pub use client::{ClientError, CommercetoolsClient, ProductDiscountApi};
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use resource::{Plan, ProductDiscountConfig, ProductDiscountResource, ResourceData};
pub use schema::{Diagnostic, Diagnostics, Severity};
