//! Property mappings from public sort keys to storage fields
//!
//! Clients sort by the names a resource publishes (`"Name"`, `"Age"`). The
//! storage side sorts by entity fields (`"last_name"`, `"date_of_birth"`).
//! A [`PropertyMappingTable`] holds one [`PropertyMapping`] per
//! resource/entity pair and translates `orderBy` strings into [`SortKey`]s.
//!
//! The table is assembled once through [`PropertyMappingTableBuilder`] and is
//! read-only afterwards, so it can be shared behind an `Arc` without locking.

use crate::config::QueryConfig;
use crate::core::entity::{Entity, Resource};
use crate::core::error::ConfigError;
use crate::core::field::normalize;
use indexmap::IndexMap;
use regex::Regex;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::OnceLock;

/// One public sort key's translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMappingEntry {
    destination_fields: Vec<String>,
    revert: bool,
}

impl PropertyMappingEntry {
    /// Map to the given storage fields, keeping the requested direction
    pub fn new<I, S>(destination_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destination_fields: destination_fields.into_iter().map(Into::into).collect(),
            revert: false,
        }
    }

    /// Map to the given storage fields, inverting the requested direction
    ///
    /// Used when the public name runs opposite to the stored one, e.g. an
    /// `Age` key backed by a date of birth.
    pub fn reverted<I, S>(destination_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revert: true,
            ..Self::new(destination_fields)
        }
    }

    pub fn destination_fields(&self) -> &[String] {
        &self.destination_fields
    }

    pub fn revert(&self) -> bool {
        self.revert
    }
}

/// A storage field plus the direction to sort it in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// One parsed `orderBy` clause: `key` or `key asc` or `key desc`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByToken {
    pub key: String,
    pub descending: bool,
}

impl OrderByToken {
    /// Parse a comma-separated `orderBy` string
    ///
    /// Tokens are trimmed and empty tokens are skipped. A token with anything
    /// other than `asc`/`desc` after the key is rejected and returned as the error.
    pub fn parse_list(order_by: &str) -> Result<Vec<OrderByToken>, String> {
        order_by
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::parse(token).ok_or_else(|| token.to_string()))
            .collect()
    }

    fn parse(token: &str) -> Option<OrderByToken> {
        static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TOKEN_REGEX.get_or_init(|| {
            Regex::new(r"(?i)^(\S+)(?:\s+(asc|desc))?$").expect("order-by pattern is valid")
        });

        let captures = regex.captures(token)?;
        let descending = captures
            .get(2)
            .is_some_and(|dir| dir.as_str().eq_ignore_ascii_case("desc"));

        Some(OrderByToken {
            key: captures[1].to_string(),
            descending,
        })
    }
}

/// Sort-key mapping for one resource/entity pair
#[derive(Debug, Clone)]
pub struct PropertyMapping {
    dto: &'static str,
    entity: &'static str,
    /// Lowercased key -> (declared key, entry)
    entries: IndexMap<String, (String, PropertyMappingEntry)>,
}

impl PropertyMapping {
    fn new(dto: &'static str, entity: &'static str) -> Self {
        Self {
            dto,
            entity,
            entries: IndexMap::new(),
        }
    }

    /// Look up a public key case-insensitively
    pub fn get(&self, key: &str) -> Option<&PropertyMappingEntry> {
        self.entries
            .get(&normalize(key))
            .map(|(_, entry)| entry)
    }

    /// Public keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(key, _)| key.as_str())
    }

    /// Whether every token of `order_by` is a mapped key
    ///
    /// `None` and blank strings are always valid.
    pub fn is_valid(&self, order_by: Option<&str>) -> bool {
        let Some(order_by) = order_by else {
            return true;
        };

        match OrderByToken::parse_list(order_by) {
            Ok(tokens) => tokens.iter().all(|token| self.get(&token.key).is_some()),
            Err(_) => false,
        }
    }

    /// Translate `order_by` into storage sort keys
    ///
    /// Each entry's fields expand in order and share the token's direction,
    /// flipped when the entry is reverted.
    pub fn resolve(&self, order_by: Option<&str>) -> Result<Vec<SortKey>, ConfigError> {
        let Some(order_by) = order_by else {
            return Ok(Vec::new());
        };

        let tokens = OrderByToken::parse_list(order_by).map_err(|token| self.unknown(&token))?;

        let mut keys = Vec::new();
        for token in tokens {
            let entry = self.get(&token.key).ok_or_else(|| self.unknown(&token.key))?;
            let descending = token.descending ^ entry.revert;
            keys.extend(entry.destination_fields.iter().map(|field| SortKey {
                field: field.clone(),
                descending,
            }));
        }

        Ok(keys)
    }

    fn unknown(&self, key: &str) -> ConfigError {
        ConfigError::UnknownSortKey {
            key: key.to_string(),
            dto: self.dto.to_string(),
            entity: self.entity.to_string(),
        }
    }
}

/// Process-wide, read-only registry of property mappings
#[derive(Debug, Clone, Default)]
pub struct PropertyMappingTable {
    mappings: HashMap<(TypeId, TypeId), PropertyMapping>,
}

impl PropertyMappingTable {
    /// Start assembling a table
    pub fn builder() -> PropertyMappingTableBuilder {
        PropertyMappingTableBuilder::default()
    }

    /// Get the mapping for a resource/entity pair
    pub fn mapping_for<D: Resource, E: Entity>(&self) -> Result<&PropertyMapping, ConfigError> {
        self.mappings
            .get(&(TypeId::of::<D>(), TypeId::of::<E>()))
            .ok_or_else(|| ConfigError::MissingMapping {
                dto: short_type_name::<D>().to_string(),
                entity: short_type_name::<E>().to_string(),
            })
    }

    /// Whether a mapping was registered for the pair
    pub fn has_mapping<D: Resource, E: Entity>(&self) -> bool {
        self.mappings
            .contains_key(&(TypeId::of::<D>(), TypeId::of::<E>()))
    }

    /// Validate a client `orderBy` against the pair's mapping
    ///
    /// Returns `false` for unmapped keys. An unregistered pair is a setup bug;
    /// it is logged and also reported as `false`.
    pub fn valid_mapping_exists_for<D: Resource, E: Entity>(&self, order_by: Option<&str>) -> bool {
        match self.mapping_for::<D, E>() {
            Ok(mapping) => mapping.is_valid(order_by),
            Err(err) => {
                tracing::error!(error = %err, "sort validation against unregistered mapping");
                false
            }
        }
    }

    /// Translate `orderBy` into storage sort keys for the pair
    pub fn resolve<D: Resource, E: Entity>(
        &self,
        order_by: Option<&str>,
    ) -> Result<Vec<SortKey>, ConfigError> {
        self.mapping_for::<D, E>()?.resolve(order_by)
    }

    /// Number of registered pairs
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Builder for [`PropertyMappingTable`]
///
/// Registration problems are collected and reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PropertyMappingTableBuilder {
    mappings: HashMap<(TypeId, TypeId), PropertyMapping>,
    errors: Vec<ConfigError>,
}

impl PropertyMappingTableBuilder {
    /// Register the sort keys of a resource/entity pair
    ///
    /// Registering the same pair twice replaces the earlier mapping.
    pub fn register<D, E, I, K>(mut self, entries: I) -> Self
    where
        D: Resource,
        E: Entity,
        I: IntoIterator<Item = (K, PropertyMappingEntry)>,
        K: Into<String>,
    {
        let mut mapping = PropertyMapping::new(short_type_name::<D>(), short_type_name::<E>());

        for (key, entry) in entries {
            let key: String = key.into();
            let key = key.trim().to_string();

            if key.is_empty() || key.contains(char::is_whitespace) || key.contains(',') {
                self.errors.push(ConfigError::InvalidValue {
                    field: format!("{}.mapping", mapping.dto),
                    value: key,
                    message: "sort keys must be single words".to_string(),
                });
                continue;
            }

            if entry.destination_fields.is_empty() {
                self.errors.push(ConfigError::InvalidValue {
                    field: format!("{}.mapping.{}", mapping.dto, key),
                    value: String::new(),
                    message: "a sort key must map to at least one field".to_string(),
                });
                continue;
            }

            let folded = normalize(&key);
            if mapping.entries.contains_key(&folded) {
                self.errors.push(ConfigError::InvalidValue {
                    field: format!("{}.mapping", mapping.dto),
                    value: key,
                    message: "sort key registered twice".to_string(),
                });
                continue;
            }

            mapping.entries.insert(folded, (key, entry));
        }

        tracing::debug!(
            dto = mapping.dto,
            entity = mapping.entity,
            keys = mapping.entries.len(),
            "registered property mapping"
        );

        self.mappings
            .insert((TypeId::of::<D>(), TypeId::of::<E>()), mapping);
        self
    }

    /// Register a pair from the `mappings` section of a [`QueryConfig`]
    ///
    /// The section is looked up by `D::resource_name()`. A missing section is
    /// recorded as [`ConfigError::MissingMapping`].
    pub fn register_from_config<D: Resource, E: Entity>(mut self, config: &QueryConfig) -> Self {
        let Some(section) = config.mapping_for(D::resource_name()) else {
            self.errors.push(ConfigError::MissingMapping {
                dto: short_type_name::<D>().to_string(),
                entity: short_type_name::<E>().to_string(),
            });
            return self;
        };

        // HashMap order is arbitrary; sort so registration is reproducible
        let mut keys: Vec<_> = section.iter().collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));

        self.register::<D, E, _, _>(keys.into_iter().map(|(key, entry)| {
            let mapped = if entry.revert {
                PropertyMappingEntry::reverted(entry.fields.iter().cloned())
            } else {
                PropertyMappingEntry::new(entry.fields.iter().cloned())
            };
            (key.clone(), mapped)
        }))
    }

    /// Freeze the table
    ///
    /// Fails with the first registration problem, if any.
    pub fn build(self) -> Result<PropertyMappingTable, ConfigError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        Ok(PropertyMappingTable {
            mappings: self.mappings,
        })
    }
}

/// Type name without its module path
pub(crate) fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
