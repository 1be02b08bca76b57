//! Macros for reducing boilerplate when defining store-owned records

/// Define a record owned by a store
///
/// Generates the struct (with `id`, `storeId`, `createdAt` and `updatedAt`
/// around the listed fields, serialized in camelCase), its
/// [`Entity`](crate::core::entity::Entity) implementation and a `new`
/// constructor taking the store id followed by the listed fields.
///
/// # Example
///
/// ```rust,ignore
/// impl_store_entity!(Size, "sizes", "size", {
///     name: String,
///     name_ru: Option<String>,
///     name_kg: Option<String>,
///     value: String,
/// });
///
/// let size = Size::new(store_id, "Large".into(), None, None, "L".into());
/// ```
#[macro_export]
macro_rules! impl_store_entity {
    (
        $type:ident,
        $plural:expr,
        $singular:expr,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $type {
            /// Unique identifier for this record
            pub id: ::uuid::Uuid,

            /// Store that owns this record
            pub store_id: ::uuid::Uuid,

            $( $(#[$field_meta])* pub $field : $field_type, )*

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
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

            fn store_id(&self) -> ::uuid::Uuid {
                self.store_id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }

        impl $type {
            /// Create a new record in `store_id`
            #[allow(clippy::too_many_arguments)]
            pub fn new(store_id: ::uuid::Uuid, $( $field: $field_type ),*) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    store_id,
                    $( $field, )*
                    created_at: now,
                    updated_at: now,
                }
            }
        }
    };
}
