//! Newtype IDs for type-safe references to Storefront API objects.
//!
//! The Storefront API identifies every node with a global ID of the form
//! `gid://shopify/{Type}/{number}`. Use the `define_gid!` macro to create
//! wrappers that keep product, variant and collection IDs from being mixed up.

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `legacy_id()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use impact_core::define_gid;
/// define_gid!(ProductId);
/// define_gid!(VariantId);
///
/// let product_id = ProductId::new("gid://shopify/Product/1");
/// let variant_id = VariantId::new("gid://shopify/ProductVariant/1");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variant_id;
/// ```
#[macro_export]
macro_rules! define_gid {
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
            /// Create a new ID from a global ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying global ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The trailing numeric segment of the global ID, if any.
            #[must_use]
            pub fn legacy_id(&self) -> Option<&str> {
                self.0
                    .rsplit('/')
                    .next()
                    .filter(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(ProductId);
define_gid!(VariantId);
define_gid!(CollectionId);
define_gid!(ImageId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_id_from_gid() {
        let id = VariantId::new("gid://shopify/ProductVariant/4242");
        assert_eq!(id.legacy_id(), Some("4242"));
    }

    #[test]
    fn test_legacy_id_missing() {
        assert_eq!(ProductId::new("not-a-gid").legacy_id(), None);
        assert_eq!(ProductId::new("gid://shopify/Product/").legacy_id(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let id = CollectionId::new("gid://shopify/Collection/7");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"gid://shopify/Collection/7\"");
        let back: CollectionId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
