//! Newtype IDs for type-safe entity references.
//!
//! Document-store keys are opaque strings handed out by the managed auth
//! provider and the store itself, so every ID wraps a `String` rather than an
//! integer. Use the `define_id!` macro to create new wrappers.

/// Macro to define a type-safe ID wrapper around an opaque string key.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`/`From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use helper_buddy_core::define_id;
/// define_id!(UserId);
/// define_id!(ServiceId);
///
/// let user_id = UserId::new("uid-9000");
/// let service_id = ServiceId::new("svc-milk-delivery");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = service_id;
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying key.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ServiceId);
define_id!(OrderId);
define_id!(ProviderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let user = UserId::new("u1");
        let service = ServiceId::new("u1");
        // Same key, different types; equality only exists within a type.
        assert_eq!(user.as_str(), service.as_str());
    }

    #[test]
    fn test_display_and_from() {
        let id: OrderId = "order-42".into();
        assert_eq!(format!("{id}"), "order-42");
        assert_eq!(OrderId::from("order-42".to_owned()), id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProviderId::new("prov-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"prov-1\"");
        let parsed: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
