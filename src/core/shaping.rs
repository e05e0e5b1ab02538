//! Field shaping: project resources onto a client-chosen set of fields

use crate::core::entity::{FieldDescriptor, Resource};
use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered field name -> value view of one resource
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedRecord(IndexMap<String, FieldValue>);

impl ShapedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add a value under `field`, e.g. a link the caller builds
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

/// Split a `fields` parameter into trimmed, non-empty names
///
/// `None` and blank input both mean "no selection".
pub fn parse_field_list(fields: Option<&str>) -> Vec<&str> {
    fields
        .map(|fields| {
            fields
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether every requested field exists on `R`
///
/// This is the client-input check run before shaping: unlike [`shape`] it
/// rejects unknown names.
pub fn type_has_properties<R: Resource>(fields: Option<&str>) -> bool {
    parse_field_list(fields)
        .into_iter()
        .all(|name| R::field(name).is_some())
}

/// Project `resource` onto the requested fields
///
/// Without a selection every public field is included in declaration order.
/// Names match case-insensitively, unknown names are ignored and a field
/// requested twice appears once, at its first position. Keys always use the
/// resource's own casing.
pub fn shape<R: Resource>(resource: &R, fields: Option<&str>) -> ShapedRecord {
    let selected = selected_fields::<R>(fields);
    project(resource, &selected)
}

/// Shape every resource of a sequence, keeping its order
pub fn shape_many<'a, R, I>(resources: I, fields: Option<&str>) -> Vec<ShapedRecord>
where
    R: Resource + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let selected = selected_fields::<R>(fields);
    resources
        .into_iter()
        .map(|resource| project(resource, &selected))
        .collect()
}

fn selected_fields<R: Resource>(fields: Option<&str>) -> Vec<&'static FieldDescriptor<R>> {
    let names = parse_field_list(fields);
    if names.is_empty() {
        return R::fields().iter().collect();
    }

    let mut selected: Vec<&'static FieldDescriptor<R>> = Vec::with_capacity(names.len());
    for name in names {
        let Some(descriptor) = R::field(name) else {
            continue;
        };
        if !selected.iter().any(|chosen| chosen.name == descriptor.name) {
            selected.push(descriptor);
        }
    }
    selected
}

fn project<R: Resource>(resource: &R, selected: &[&'static FieldDescriptor<R>]) -> ShapedRecord {
    ShapedRecord(
        selected
            .iter()
            .map(|descriptor| (descriptor.name.to_string(), (descriptor.get)(resource)))
            .collect(),
    )
}
