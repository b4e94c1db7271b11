//! Incremental engine builders.
//!
//! Building starts from [`builder`] and moves through three states, each its
//! own type:
//!
//! ```text
//! Builder ──add_field──────────────▶ EqualityBuilder ──build──▶ EqualityEngine
//!    │                                  ▲     │
//!    │                                  │     └─add_field─┐
//!    │                          add_field (demotes)       │
//!    │                                  │     ◀───────────┘
//!    └──add_comparable_field──▶ ComparableBuilder ──build──▶ OrderingEngine
//! ```
//!
//! Adding an equality-only field to a [`ComparableBuilder`] demotes every
//! comparable field registered so far: once any field cannot be ordered, the
//! resulting engine cannot be ordered either. Field order is preserved.
//!
//! `build` borrows the builder, so it can be called any number of times; each
//! call returns an independent, immutable engine.

use std::any::type_name;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::comparator::FieldComparator;
use crate::engine::{EqualityEngine, OrderingEngine};
use crate::field::FieldDescriptor;

/// Creates an empty builder for the owner type `T`.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use standout_parity::{builder, FieldComparator};
///
/// struct Task {
///     name: String,
///     priority: u8,
///     tags: Vec<String>,
/// }
///
/// let engine = builder::<Task>()
///     .add_comparable_field_with(
///         |t: &Task| &t.priority,
///         FieldComparator::natural().reversed(),
///     )
///     .add_comparable_field(|t: &Task| t.name.as_str())
///     .build();
///
/// let urgent = Task { name: "fix".into(), priority: 5, tags: vec![] };
/// let later = Task { name: "docs".into(), priority: 1, tags: vec![] };
/// assert_eq!(engine.compare(&urgent, &later), Ordering::Less);
/// ```
pub fn builder<T: 'static>() -> Builder<T> {
    Builder::new()
}

/// A builder with no fields yet.
pub struct Builder<T> {
    owner: PhantomData<fn() -> T>,
}

impl<T: 'static> Builder<T> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Builder { owner: PhantomData }
    }

    /// Adds a field used for equality and hashing only.
    pub fn add_field<V, F>(self, extractor: F) -> EqualityBuilder<T>
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        EqualityBuilder::empty().add_field(extractor)
    }

    /// Adds a field ordered by its natural order.
    pub fn add_comparable_field<V, F>(self, extractor: F) -> ComparableBuilder<T>
    where
        V: Ord + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        ComparableBuilder::default().add_comparable_field(extractor)
    }

    /// Adds a field ordered by `comparator`.
    pub fn add_comparable_field_with<V, F>(
        self,
        extractor: F,
        comparator: FieldComparator<V>,
    ) -> ComparableBuilder<T>
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        ComparableBuilder::default().add_comparable_field_with(extractor, comparator)
    }

    /// Adds an optional field, absent first, present values in natural order.
    pub fn add_optional_comparable_field<V, F>(self, extractor: F) -> ComparableBuilder<T>
    where
        V: Ord + Hash + ?Sized + 'static,
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        ComparableBuilder::default().add_optional_comparable_field(extractor)
    }

    /// Adds an optional field, absent first, present values ordered by
    /// `comparator`.
    pub fn add_optional_comparable_field_with<V, F>(
        self,
        extractor: F,
        comparator: FieldComparator<V>,
    ) -> ComparableBuilder<T>
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        ComparableBuilder::default().add_optional_comparable_field_with(extractor, comparator)
    }

    /// Builds an engine with no fields.
    ///
    /// Every item of `T` is equal to, hashes like, and compares equal to
    /// every other.
    pub fn build(&self) -> OrderingEngine<T> {
        ComparableBuilder::default().build()
    }
}

impl<T: 'static> Default for Builder<T> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<T> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Builder { owner: PhantomData }
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("owner", &type_name::<T>())
            .finish()
    }
}

/// A builder whose engine supports equality and hashing only.
///
/// Obtained by adding an equality-only field, so it always holds at least one
/// field. There is no public way to create an empty one:
///
/// ```compile_fail
/// use standout_parity::EqualityBuilder;
///
/// let empty: EqualityBuilder<String> = EqualityBuilder::default();
/// ```
pub struct EqualityBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> EqualityBuilder<T> {
    // Always followed by `add_field`.
    fn empty() -> Self {
        EqualityBuilder { fields: Vec::new() }
    }
}

impl<T: 'static> EqualityBuilder<T> {
    /// Adds a field used for equality and hashing.
    pub fn add_field<V, F>(mut self, extractor: F) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor::new(extractor));
        self
    }

    /// Builds an equality engine over the fields added so far.
    pub fn build(&self) -> EqualityEngine<T> {
        tracing::debug!(
            owner = type_name::<T>(),
            fields = self.fields.len(),
            "built equality engine"
        );
        EqualityEngine::new(self.fields.clone())
    }

    /// Number of fields added so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields were added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}


impl<T> Clone for EqualityBuilder<T> {
    fn clone(&self) -> Self {
        EqualityBuilder {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for EqualityBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityBuilder")
            .field("owner", &type_name::<T>())
            .field("fields", &self.fields)
            .finish()
    }
}

/// A builder whose engine supports equality, hashing and ordering.
pub struct ComparableBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> ComparableBuilder<T> {
    /// Adds a field ordered by its natural order.
    pub fn add_comparable_field<V, F>(self, extractor: F) -> Self
    where
        V: Ord + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.add_comparable_field_with(extractor, FieldComparator::natural())
    }

    /// Adds a field ordered by `comparator`.
    pub fn add_comparable_field_with<V, F>(
        mut self,
        extractor: F,
        comparator: FieldComparator<V>,
    ) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.fields
            .push(FieldDescriptor::comparable(extractor, comparator));
        self
    }

    /// Adds an optional field, absent first, present values in natural order.
    pub fn add_optional_comparable_field<V, F>(self, extractor: F) -> Self
    where
        V: Ord + Hash + ?Sized + 'static,
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        self.add_optional_comparable_field_with(extractor, FieldComparator::natural())
    }

    /// Adds an optional field, absent first, present values ordered by
    /// `comparator`.
    pub fn add_optional_comparable_field_with<V, F>(
        mut self,
        extractor: F,
        comparator: FieldComparator<V>,
    ) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        self.fields
            .push(FieldDescriptor::optional(extractor, comparator));
        self
    }

    /// Adds a field used for equality and hashing only.
    ///
    /// Every comparable field added so far loses its comparator and the
    /// builder can no longer produce an [`OrderingEngine`].
    pub fn add_field<V, F>(self, extractor: F) -> EqualityBuilder<T>
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        tracing::debug!(
            owner = type_name::<T>(),
            demoted = self.fields.len(),
            "comparable fields demoted to equality-only"
        );

        let fields = self
            .fields
            .into_iter()
            .map(FieldDescriptor::demoted)
            .collect();

        EqualityBuilder { fields }.add_field(extractor)
    }

    /// Builds an ordering engine over the fields added so far.
    pub fn build(&self) -> OrderingEngine<T> {
        tracing::debug!(
            owner = type_name::<T>(),
            fields = self.fields.len(),
            "built ordering engine"
        );
        OrderingEngine::new(self.fields.clone())
    }

    /// Number of fields added so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields were added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Default for ComparableBuilder<T> {
    fn default() -> Self {
        ComparableBuilder { fields: Vec::new() }
    }
}

impl<T> Clone for ComparableBuilder<T> {
    fn clone(&self) -> Self {
        ComparableBuilder {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for ComparableBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparableBuilder")
            .field("owner", &type_name::<T>())
            .field("fields", &self.fields)
            .finish()
    }
}
