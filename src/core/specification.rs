//! Composable specifications for filtering entity collections
//!
//! A [`Specification`] is a named predicate over one entity type. Its body
//! is a [`Criterion`] tree rather than a closure, so the same specification
//! can be evaluated in memory ([`Specification::is_satisfied_by`]) or handed
//! to a storage layer that walks the tree with a [`CriterionVisitor`] and
//! builds its own query.
//!
//! # Example
//!
//! ```rust,ignore
//! let spec = Specification::<Coin>::equals("country", "Mexico")
//!     .and(Specification::contains("coin_type", "peso"))
//!     .and(!Specification::equals("year", 1921));
//!
//! let mexican_pesos = filter(&spec, coins);
//! ```

use crate::core::entity::Entity;
use crate::core::field::{FieldValue, normalize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, Not};

/// Predicate tree evaluated against an entity's storage fields
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Matches everything
    All,
    /// Field equals value after trimming and case-folding text
    Equals { field: String, value: FieldValue },
    /// Field text contains the needle, case-insensitively
    Contains { field: String, needle: String },
    And(Box<Criterion>, Box<Criterion>),
    Or(Box<Criterion>, Box<Criterion>),
    Not(Box<Criterion>),
}

impl Criterion {
    /// Evaluate against anything that exposes fields by name
    ///
    /// A missing field satisfies neither `Equals` nor `Contains`.
    pub fn evaluate<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<FieldValue>,
    {
        match self {
            Criterion::All => true,
            Criterion::Equals { field, value } => {
                lookup(field).is_some_and(|actual| actual.matches_normalized(value))
            }
            Criterion::Contains { field, needle } => {
                let needle = normalize(needle);
                lookup(field)
                    .and_then(|actual| actual.as_text())
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            }
            Criterion::And(left, right) => left.evaluate(lookup) && right.evaluate(lookup),
            Criterion::Or(left, right) => left.evaluate(lookup) || right.evaluate(lookup),
            Criterion::Not(inner) => !inner.evaluate(lookup),
        }
    }

    /// Walk the tree with a visitor
    pub fn accept<V: CriterionVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Criterion::All => visitor.visit_all(),
            Criterion::Equals { field, value } => visitor.visit_equals(field, value),
            Criterion::Contains { field, needle } => visitor.visit_contains(field, needle),
            Criterion::And(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_and(left, right)
            }
            Criterion::Or(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_or(left, right)
            }
            Criterion::Not(inner) => {
                let inner = inner.accept(visitor);
                visitor.visit_not(inner)
            }
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::All => write!(f, "*"),
            Criterion::Equals { field, value } => write!(f, "{} = '{}'", field, value),
            Criterion::Contains { field, needle } => write!(f, "{} ~ '{}'", field, needle),
            Criterion::And(left, right) => write!(f, "({} AND {})", left, right),
            Criterion::Or(left, right) => write!(f, "({} OR {})", left, right),
            Criterion::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

/// Translates a [`Criterion`] tree bottom-up into another representation
///
/// Storage backends implement this to turn specifications into their native
/// filter language.
pub trait CriterionVisitor {
    type Output;

    fn visit_all(&mut self) -> Self::Output;
    fn visit_equals(&mut self, field: &str, value: &FieldValue) -> Self::Output;
    fn visit_contains(&mut self, field: &str, needle: &str) -> Self::Output;
    fn visit_and(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn visit_or(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn visit_not(&mut self, inner: Self::Output) -> Self::Output;
}

/// A named, composable predicate over entities of type `T`
pub struct Specification<T> {
    name: String,
    criterion: Criterion,
    _entity: PhantomData<fn(&T) -> bool>,
}

impl<T> Specification<T> {
    /// Wrap a criterion under a name
    pub fn new(name: impl Into<String>, criterion: Criterion) -> Self {
        Self {
            name: name.into(),
            criterion,
            _entity: PhantomData,
        }
    }

    /// Specification satisfied by every entity
    pub fn all() -> Self {
        Self::new("all", Criterion::All)
    }

    /// Field equals value (normalized for text)
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let field = field.into();
        let value = value.into();
        Self::new(
            format!("{}_equals", field),
            Criterion::Equals { field, value },
        )
    }

    /// Field text contains `needle`, ignoring case
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            format!("{}_contains", field),
            Criterion::Contains {
                field,
                needle: needle.into(),
            },
        )
    }

    /// Any of `fields` contains `needle`, ignoring case
    ///
    /// This is the shape of a resource's free-text search. With no fields it
    /// matches nothing.
    pub fn any_contains<I, S>(fields: I, needle: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criterion = fields
            .into_iter()
            .map(|field| Criterion::Contains {
                field: field.into(),
                needle: needle.to_string(),
            })
            .reduce(|left, right| Criterion::Or(Box::new(left), Box::new(right)))
            .unwrap_or_else(|| Criterion::Not(Box::new(Criterion::All)));

        Self::new("search", criterion)
    }

    /// Give the specification a different name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    /// Both specifications hold
    pub fn and(self, other: Specification<T>) -> Specification<T> {
        Specification::new(
            format!("({} and {})", self.name, other.name),
            Criterion::And(Box::new(self.criterion), Box::new(other.criterion)),
        )
    }

    /// Either specification holds
    pub fn or(self, other: Specification<T>) -> Specification<T> {
        Specification::new(
            format!("({} or {})", self.name, other.name),
            Criterion::Or(Box::new(self.criterion), Box::new(other.criterion)),
        )
    }

    /// The specification does not hold
    pub fn negate(self) -> Specification<T> {
        Specification::new(
            format!("not {}", self.name),
            Criterion::Not(Box::new(self.criterion)),
        )
    }
}

impl<T: Entity> Specification<T> {
    /// Evaluate against one candidate
    pub fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.criterion
            .evaluate(&|field: &str| candidate.field_value(field))
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.criterion.clone())
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("name", &self.name)
            .field("criterion", &self.criterion)
            .finish()
    }
}

impl<T> fmt::Display for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.criterion)
    }
}

impl<T> BitAnd for Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<T> BitOr for Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<T> Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

/// Keep the candidates that satisfy `spec`, in their original order
pub fn filter<T: Entity>(spec: &Specification<T>, candidates: Vec<T>) -> Vec<T> {
    candidates
        .into_iter()
        .filter(|candidate| spec.is_satisfied_by(candidate))
        .collect()
}
