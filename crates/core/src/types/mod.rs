//! Core types for Commerce Discounts.
//!
//! This module provides type-safe wrappers for the product discount domain.

pub mod action;
pub mod discount;
pub mod id;
pub mod localized;
pub mod money;

pub use action::{ProductDiscountUpdate, ProductDiscountUpdateAction};
pub use discount::{ProductDiscount, ProductDiscountDraft, ProductDiscountValue, ValueType};
pub use id::*;
pub use localized::LocalizedString;
pub use money::{CurrencyCode, CurrencyCodeError, Money};
