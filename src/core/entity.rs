//! Entity and resource traits defining what the query pipeline can work on

use crate::core::field::{FieldValue, normalize};
use uuid::Uuid;

/// Base trait for stored entities.
///
/// An entity is what the storage collaborator hands to the pipeline. It
/// exposes its storage-level fields by name so that specifications can
/// filter on them and sort keys can order by them.
///
/// Note: the field names used here are internal names (e.g. `"date_of_birth"`),
/// never the client-facing names a [`Resource`] exposes.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "coins", "banknotes")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "coin", "banknote")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the value of a storage field by its internal name
    ///
    /// Returns `None` when the entity has no such field.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// Accessor for one public field of a resource
///
/// Descriptor lists are static: they are built at compile time by
/// [`impl_resource!`](crate::impl_resource) and never per request.
pub struct FieldDescriptor<R> {
    /// Public field name, in the casing clients see it
    pub name: &'static str,

    /// Reads the field off an instance
    pub get: fn(&R) -> FieldValue,
}

impl<R> FieldDescriptor<R> {
    /// Whether `name` designates this field, ignoring case and surrounding spaces
    ///
    /// Folds case with [`normalize`], the same rule sort keys use.
    pub fn matches(&self, name: &str) -> bool {
        normalize(self.name) == normalize(name)
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDescriptor<R> {}

impl<R> std::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Trait for client-facing resources (DTOs).
///
/// A resource publishes an ordered list of fields. That list drives
/// field-selection validation and shaping.
pub trait Resource: Send + Sync + 'static {
    /// Name used in logs and error payloads (e.g., "coins")
    fn resource_name() -> &'static str;

    /// Public fields in declaration order
    fn fields() -> &'static [FieldDescriptor<Self>]
    where
        Self: Sized;

    /// Look up a public field case-insensitively
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>>
    where
        Self: Sized,
    {
        Self::fields().iter().find(|descriptor| descriptor.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestEntity {
        id: Uuid,
        label: String,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn resource_name_singular() -> &'static str {
            "test_entity"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "label" => Some(self.label.as_str().into()),
                _ => None,
            }
        }
    }

    struct TestDto {
        label: String,
    }

    impl Resource for TestDto {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn fields() -> &'static [FieldDescriptor<Self>] {
            const FIELDS: &[FieldDescriptor<TestDto>] = &[FieldDescriptor {
                name: "Label",
                get: |dto| FieldValue::from(dto.label.as_str()),
            }];
            FIELDS
        }
    }

    #[test]
    fn test_entity_metadata() {
        assert_eq!(TestEntity::resource_name(), "test_entities");
        assert_eq!(TestEntity::resource_name_singular(), "test_entity");
    }

    #[test]
    fn test_entity_field_value() {
        let entity = TestEntity {
            id: Uuid::new_v4(),
            label: "Peso".to_string(),
        };

        assert_eq!(entity.field_value("label"), Some(FieldValue::from("Peso")));
        assert_eq!(entity.field_value("id"), Some(FieldValue::Uuid(entity.id())));
        assert_eq!(entity.field_value("unknown"), None);
    }

    #[test]
    fn test_resource_field_lookup_is_case_insensitive() {
        let dto = TestDto {
            label: "Peso".to_string(),
        };

        let descriptor = TestDto::field(" label ").expect("field should resolve");
        assert_eq!(descriptor.name, "Label");
        assert_eq!((descriptor.get)(&dto), FieldValue::from("Peso"));
        assert!(TestDto::field("missing").is_none());
    }
}
