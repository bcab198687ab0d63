//! The `product_discount` resource.
//!
//! - [`data`]: configuration and persisted state shapes
//! - [`expand`] / [`flatten`]: conversion to and from the wire types
//! - [`diff`]: change detection, update actions and plans
//! - [`ProductDiscountResource`]: create / read / update / delete / import
//!   over an injected [`ProductDiscountApi`](crate::client::ProductDiscountApi)

pub mod data;
pub mod diff;
pub mod expand;
pub mod flatten;
mod product_discount;

pub use data::{MoneyBlock, ProductDiscountConfig, ResourceData, ValueBlock};
pub use diff::{ChangedField, Plan, build_actions, diff, plan};
pub use expand::ExpandError;
pub use product_discount::ProductDiscountResource;
