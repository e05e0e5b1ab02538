//! Macros for reducing boilerplate when defining entities and resources
//!
//! These macros generate the repetitive trait implementations needed
//! for each entity/resource pair the query pipeline serves.

/// Complete macro to create a stored entity with automatic trait implementation
///
/// Injects an `id: Uuid` field and implements [`Entity`](crate::core::entity::Entity)
/// so every declared field is reachable by its Rust name through `field_value`.
///
/// # Example
///
/// ```rust,ignore
/// use shelf::prelude::*;
///
/// impl_entity!(Coin, "coin", "coins", {
///     coin_type: String,
///     country: String,
///     year: Option<i32>,
/// });
///
/// let coin = Coin { id: Uuid::new_v4(), coin_type: "Peso".into(), country: "Mexico".into(), year: None };
/// assert!(coin.field_value("country").is_some());
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        {
            $( $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,
            $( pub $field : $field_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::from(self.id)),
                    $(
                        stringify!($field) => Some($crate::core::field::FieldValue::from(
                            ::std::clone::Clone::clone(&self.$field),
                        )),
                    )*
                    _ => None,
                }
            }
        }
    };
}

/// Complete macro to create a client-facing resource (DTO)
///
/// Each field is declared with its public name first. The generated
/// [`Resource`](crate::core::entity::Resource) impl lists fields in
/// declaration order, and serde uses the same public names.
///
/// # Example
///
/// ```rust,ignore
/// use shelf::prelude::*;
///
/// impl_resource!(CoinDto, "coins", {
///     "Id" => id: Uuid,
///     "Type" => coin_type: String,
/// });
///
/// assert_eq!(CoinDto::fields()[1].name, "Type");
/// ```
#[macro_export]
macro_rules! impl_resource {
    (
        $type:ident,
        $resource_name:expr,
        {
            $( $public:literal => $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            $(
                #[serde(rename = $public)]
                pub $field : $field_type
            ),*
        }

        impl $crate::core::entity::Resource for $type {
            fn resource_name() -> &'static str {
                $resource_name
            }

            fn fields() -> &'static [$crate::core::entity::FieldDescriptor<Self>] {
                const FIELDS: &[$crate::core::entity::FieldDescriptor<$type>] = &[
                    $(
                        $crate::core::entity::FieldDescriptor {
                            name: $public,
                            get: |resource: &$type| {
                                $crate::core::field::FieldValue::from(
                                    ::std::clone::Clone::clone(&resource.$field),
                                )
                            },
                        },
                    )*
                ];
                FIELDS
            }
        }
    };
}
