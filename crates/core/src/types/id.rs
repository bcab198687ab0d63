//! Newtype IDs for type-safe entity references.
//!
//! commercetools identifies resources by opaque server-assigned strings.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! mixing IDs from different resource types.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input contains a character that cannot appear in a URL path segment.
    #[error("id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` rejecting empty IDs and path separators
/// - `Display`, `AsRef<str>`, `FromStr`
///
/// # Example
///
/// ```rust
/// # use commerce_discounts_core::define_id;
/// define_id!(CartDiscountId);
/// define_id!(CategoryId);
///
/// let cart = CartDiscountId::parse("abc").unwrap();
/// let category = CategoryId::parse("abc").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: CartDiscountId = category;
/// # let _ = (cart, category);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, rejecting values that cannot be used in a request path.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty or contains `/`, `?`, `#`
            /// or whitespace.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                if s.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                if let Some(c) = s
                    .chars()
                    .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
                {
                    return Err($crate::types::id::IdError::InvalidCharacter(c));
                }
                Ok(Self(s.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductDiscountId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_style_id() {
        let id = ProductDiscountId::parse("6d4e0a0c-3a9c-4c5e-b8a4-27fba0d4a1ce").unwrap();
        assert_eq!(id.as_str(), "6d4e0a0c-3a9c-4c5e-b8a4-27fba0d4a1ce");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductDiscountId::parse(""), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_rejects_path_separators() {
        assert_eq!(
            ProductDiscountId::parse("abc/def"),
            Err(IdError::InvalidCharacter('/'))
        );
        assert_eq!(
            ProductDiscountId::parse("abc def"),
            Err(IdError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ProductDiscountId::parse("pd-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pd-1\"");
    }

    #[test]
    fn test_display() {
        let id: ProductDiscountId = "pd-1".parse().unwrap();
        assert_eq!(format!("{id}"), "pd-1");
    }
}
