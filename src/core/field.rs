//! Field values shared by sorting, filtering and shaping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Textual form used by free-text matching
    ///
    /// Null has no text, so it never matches a search term.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Total ordering used when sorting query results.
    ///
    /// Strings compare case-insensitively, integers and floats compare
    /// numerically with each other, and null sorts before everything else.
    /// Values of unrelated kinds are ordered by kind.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            _ => self.compare_folded(other),
        }
    }

    /// Case-fold a string value once, ahead of repeated comparisons
    ///
    /// Other kinds are returned unchanged.
    pub fn folded(self) -> FieldValue {
        match self {
            FieldValue::String(s) => FieldValue::String(s.to_lowercase()),
            other => other,
        }
    }

    /// Same order as [`compare`](Self::compare) for values already passed
    /// through [`folded`](Self::folded); strings compare as they are.
    pub fn compare_folded(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (String(a), String(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (Null, Null) => Ordering::Equal,
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    /// Equality after trimming and case-folding textual values
    pub fn matches_normalized(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::String(_), _) | (_, FieldValue::String(_)) => {
                match (self.as_text(), other.as_text()) {
                    (Some(a), Some(b)) => normalize(&a) == normalize(&b),
                    _ => false,
                }
            }
            _ => self.compare(other) == Ordering::Equal && self.kind_rank() == other.kind_rank(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
            FieldValue::Uuid(_) => 4,
            FieldValue::DateTime(_) => 5,
        }
    }
}

/// Trim and case-fold a string for comparisons
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::DateTime(d) => write!(f, "{}", d.to_rfc3339()),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::String(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
