//! Equality and ordering engines.
//!
//! An [`EqualityEngine`] evaluates structural equality and a combined hash
//! over an ordered list of [`FieldDescriptor`]s. An [`OrderingEngine`] adds a
//! lexicographic total order over the same fields, so the three operations
//! always agree: equal items hash identically and compare as `Equal`.
//!
//! Engines are produced by [`EqualityBuilder`](crate::EqualityBuilder) and
//! [`ComparableBuilder`](crate::ComparableBuilder), are immutable, and can be
//! shared freely between threads.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hasher;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::{ParityError, Result};
use crate::field::{CmpFn, FieldDescriptor};

/// Seed of the combined hash.
const HASH_SEED: u64 = 1;
/// Multiplier of the combined hash.
const HASH_MULTIPLIER: u64 = 31;

/// Runtime identity of an engine's owner type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner {
    type_id: TypeId,
    name: &'static str,
}

impl Owner {
    /// The identity of `T`.
    pub fn of<T: 'static>() -> Self {
        Owner {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The owner's [`TypeId`].
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The owner's type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `value` is exactly of the owner type.
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        value.type_id() == self.type_id
    }
}

/// Structural equality and hashing over registered fields.
///
/// # Example
///
/// ```
/// use standout_parity::builder;
///
/// struct Task {
///     name: String,
///     tags: Vec<String>,
/// }
///
/// let engine = builder::<Task>()
///     .add_field(|t: &Task| &t.name)
///     .add_field(|t: &Task| &t.tags)
///     .build();
///
/// let a = Task { name: "docs".into(), tags: vec!["x".into()] };
/// let b = Task { name: "docs".into(), tags: vec!["x".into()] };
///
/// assert!(engine.is_equal(&a, &b));
/// assert_eq!(engine.to_hash_code(&a), engine.to_hash_code(&b));
/// assert!(!engine.is_equal(&a, &"docs"));
/// ```
pub struct EqualityEngine<T> {
    owner: Owner,
    fields: Arc<[FieldDescriptor<T>]>,
}

impl<T: 'static> EqualityEngine<T> {
    pub(crate) fn new(fields: Vec<FieldDescriptor<T>>) -> Self {
        EqualityEngine {
            owner: Owner::of::<T>(),
            fields: fields.into(),
        }
    }

    /// Tests `this` against a value of any type.
    ///
    /// Returns `false` if `other` is not a `T`, `true` at once if both refer
    /// to the same instance, and otherwise compares every field in
    /// registration order, stopping at the first mismatch.
    pub fn is_equal(&self, this: &T, other: &dyn Any) -> bool {
        other
            .downcast_ref::<T>()
            .is_some_and(|other| self.equals(this, other))
    }
}

impl<T> EqualityEngine<T> {
    /// Tests two items of the owner type for equality.
    ///
    /// Same result as [`is_equal`](Self::is_equal) without the type check.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        std::ptr::eq(a, b) || self.fields_equal(a, b)
    }

    fn fields_equal(&self, a: &T, b: &T) -> bool {
        self.fields.iter().all(|field| field.values_equal(a, b))
    }

    /// Combined hash of all fields, in registration order.
    ///
    /// Computed as `h = 31 * h + field_hash` starting from `h = 1`, with
    /// wrapping arithmetic. Items that are [`equals`](Self::equals) always
    /// produce the same hash code.
    pub fn to_hash_code(&self, item: &T) -> u64 {
        self.fields.iter().fold(HASH_SEED, |hash, field| {
            hash.wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(field.hash_value(item))
        })
    }

    /// Feeds the combined hash into `state`.
    ///
    /// Intended for [`Hash`](std::hash::Hash) impls that delegate to an engine.
    pub fn hash_into<H: Hasher>(&self, item: &T, state: &mut H) {
        state.write_u64(self.to_hash_code(item));
    }

    /// Indices of the fields whose values differ between `a` and `b`.
    pub fn differing_fields(&self, a: &T, b: &T) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.values_equal(a, b))
            .map(|(index, _)| index)
            .collect()
    }

    /// The registered fields, in registration order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are registered.
    ///
    /// All items of the owner type are equal under an empty engine.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The owner type's identity.
    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Returns `true` if every field carries a comparator.
    ///
    /// Matches whether [`OrderingEngine::try_from`] succeeds. An empty engine
    /// only comes from an empty ordering engine, so it is comparable.
    pub fn is_comparable(&self) -> bool {
        self.fields.iter().all(FieldDescriptor::is_comparable)
    }
}

impl<T> Clone for EqualityEngine<T> {
    fn clone(&self) -> Self {
        EqualityEngine {
            owner: self.owner,
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<T> fmt::Debug for EqualityEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityEngine")
            .field("owner", &self.owner.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Structural equality, hashing and a lexicographic total order.
///
/// Dereferences to its [`EqualityEngine`], so every equality operation is
/// available directly.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use standout_parity::builder;
///
/// struct Release {
///     major: u32,
///     label: Option<String>,
/// }
///
/// let engine = builder::<Release>()
///     .add_comparable_field(|r: &Release| &r.major)
///     .add_optional_comparable_field(|r: &Release| r.label.as_deref())
///     .build();
///
/// let plain = Release { major: 2, label: None };
/// let beta = Release { major: 2, label: Some("beta".into()) };
///
/// assert_eq!(engine.compare(&plain, &beta), Ordering::Less);
/// assert!(!engine.is_equal(&plain, &beta));
/// ```
pub struct OrderingEngine<T> {
    base: EqualityEngine<T>,
    comparators: Arc<[Arc<CmpFn<T>>]>,
}

impl<T: 'static> OrderingEngine<T> {
    /// Every field must carry a comparator.
    pub(crate) fn new(fields: Vec<FieldDescriptor<T>>) -> Self {
        let comparators: Vec<Arc<CmpFn<T>>> = fields
            .iter()
            .filter_map(|field| field.comparator().cloned())
            .collect();
        debug_assert_eq!(comparators.len(), fields.len());

        OrderingEngine {
            base: EqualityEngine::new(fields),
            comparators: comparators.into(),
        }
    }
}

impl<T> OrderingEngine<T> {
    /// Compares two items field by field.
    ///
    /// Returns the first non-`Equal` field comparison in registration order,
    /// or `Equal` if every field compares equal.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.comparators
            .iter()
            .map(|cmp| cmp(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sorts a slice in place (stable).
    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    /// Returns references to the items in sorted order (stable).
    pub fn sorted<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut results: Vec<&'a T> = items.iter().collect();
        results.sort_by(|a, b| self.compare(a, b));
        results
    }

    /// Returns `true` if the items are in non-descending order.
    pub fn is_sorted(&self, items: &[T]) -> bool {
        items
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]).is_le())
    }

    /// The smallest item; the first one on ties.
    pub fn min<'a>(&self, items: &'a [T]) -> Option<&'a T> {
        items.iter().min_by(|a, b| self.compare(a, b))
    }

    /// The largest item; the last one on ties.
    pub fn max<'a>(&self, items: &'a [T]) -> Option<&'a T> {
        items.iter().max_by(|a, b| self.compare(a, b))
    }

    /// The equality engine over the same fields.
    pub fn as_equality(&self) -> &EqualityEngine<T> {
        &self.base
    }

    /// Converts into the equality engine over the same fields.
    ///
    /// The fields keep their comparators, so the result can be promoted back
    /// with [`OrderingEngine::try_from`].
    pub fn into_equality(self) -> EqualityEngine<T> {
        self.base
    }
}

impl<T> Deref for OrderingEngine<T> {
    type Target = EqualityEngine<T>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<T> Clone for OrderingEngine<T> {
    fn clone(&self) -> Self {
        OrderingEngine {
            base: self.base.clone(),
            comparators: Arc::clone(&self.comparators),
        }
    }
}

impl<T> fmt::Debug for OrderingEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderingEngine")
            .field("owner", &self.base.owner.name)
            .field("fields", &self.base.fields)
            .finish()
    }
}

impl<T> TryFrom<EqualityEngine<T>> for OrderingEngine<T> {
    type Error = ParityError;

    /// Promotes an equality engine whose fields all carry comparators.
    fn try_from(engine: EqualityEngine<T>) -> Result<Self> {
        let comparators = engine
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                field
                    .comparator()
                    .cloned()
                    .ok_or(ParityError::InvalidFieldConfiguration {
                        owner: engine.owner.name,
                        index,
                        value_type: field.value_type(),
                    })
            })
            .collect::<Result<Vec<_>>>();

        match comparators {
            Ok(comparators) => Ok(OrderingEngine {
                base: engine,
                comparators: comparators.into(),
            }),
            Err(err) => {
                tracing::debug!(error = %err, "equality engine cannot be promoted to ordering");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::builder;

    #[derive(Debug, Clone)]
    struct Task {
        name: String,
        priority: i64,
        tags: Vec<String>,
    }

    fn task(name: &str, priority: i64, tags: &[&str]) -> Task {
        Task {
            name: name.to_string(),
            priority,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn equality() -> EqualityEngine<Task> {
        builder::<Task>()
            .add_field(|t: &Task| &t.name)
            .add_field(|t: &Task| &t.priority)
            .add_field(|t: &Task| &t.tags)
            .build()
    }

    fn ordering() -> OrderingEngine<Task> {
        builder::<Task>()
            .add_comparable_field(|t: &Task| &t.priority)
            .add_comparable_field(|t: &Task| &t.name)
            .build()
    }

    #[test]
    fn owner_identity() {
        let owner = Owner::of::<Task>();
        assert_eq!(owner.type_id(), TypeId::of::<Task>());
        assert!(owner.name().ends_with("Task"));
        assert!(owner.is_instance(&task("a", 1, &[])));
        assert!(!owner.is_instance(&"a"));
    }

    #[test]
    fn is_equal_same_instance() {
        let t = task("a", 1, &["x"]);
        assert!(equality().is_equal(&t, &t));
    }

    #[test]
    fn is_equal_rejects_other_types() {
        let t = task("a", 1, &["x"]);
        assert!(!equality().is_equal(&t, &"a"));
        assert!(!equality().is_equal(&t, &1i64));
    }

    #[test]
    fn is_equal_rejects_value_sharing_the_address() {
        struct Inner {
            v: u32,
        }
        #[repr(C)]
        struct Outer {
            inner: Inner,
        }

        let engine = builder::<Outer>().add_field(|o: &Outer| &o.inner.v).build();
        let outer = Outer { inner: Inner { v: 7 } };

        assert_eq!(
            &outer as *const Outer as *const (),
            &outer.inner as *const Inner as *const ()
        );
        assert!(!engine.is_equal(&outer, &outer.inner));
        assert!(!engine.is_equal(&outer, &outer.inner.v));
        assert!(engine.is_equal(&outer, &outer));
    }

    #[test]
    fn is_equal_compares_fields_deeply() {
        let engine = equality();
        let a = task("a", 1, &["x", "y"]);

        assert!(engine.is_equal(&a, &task("a", 1, &["x", "y"])));
        assert!(!engine.is_equal(&a, &task("a", 1, &["x"])));
        assert!(!engine.is_equal(&a, &task("b", 1, &["x", "y"])));
        assert!(!engine.is_equal(&a, &task("a", 2, &["x", "y"])));
    }

    #[test]
    fn equals_matches_is_equal() {
        let engine = equality();
        let a = task("a", 1, &["x"]);
        let b = task("a", 1, &["x"]);
        let c = task("c", 1, &["x"]);

        assert_eq!(engine.equals(&a, &b), engine.is_equal(&a, &b));
        assert_eq!(engine.equals(&a, &c), engine.is_equal(&a, &c));
        assert!(engine.equals(&a, &a));
    }

    #[test]
    fn hash_code_matches_for_equal_items() {
        let engine = equality();
        let a = task("a", 1, &["x"]);
        let b = task("a", 1, &["x"]);
        assert_eq!(engine.to_hash_code(&a), engine.to_hash_code(&b));
    }

    #[test]
    fn hash_code_is_order_sensitive() {
        let forward = builder::<(String, String)>()
            .add_field(|p: &(String, String)| &p.0)
            .add_field(|p: &(String, String)| &p.1)
            .build();

        let pair = ("left".to_string(), "right".to_string());
        let swapped = ("right".to_string(), "left".to_string());
        assert_ne!(forward.to_hash_code(&pair), forward.to_hash_code(&swapped));
    }

    #[test]
    fn hash_code_of_empty_engine_is_seed() {
        let engine = builder::<Task>().build();
        assert_eq!(engine.to_hash_code(&task("a", 1, &[])), HASH_SEED);
    }

    #[test]
    fn hash_into_writes_hash_code() {
        let engine = equality();
        let t = task("a", 1, &[]);

        let mut state = rustc_hash::FxHasher::default();
        engine.hash_into(&t, &mut state);

        let mut expected = rustc_hash::FxHasher::default();
        expected.write_u64(engine.to_hash_code(&t));
        assert_eq!(state.finish(), expected.finish());
    }

    #[test]
    fn differing_fields_lists_indices() {
        let engine = equality();
        let a = task("a", 1, &["x"]);
        let b = task("b", 1, &["y"]);
        assert_eq!(engine.differing_fields(&a, &b), vec![0, 2]);
        assert!(engine.differing_fields(&a, &a.clone()).is_empty());
    }

    #[test]
    fn compare_first_difference_wins() {
        let engine = ordering();
        assert_eq!(
            engine.compare(&task("z", 1, &[]), &task("a", 2, &[])),
            Ordering::Less
        );
        assert_eq!(
            engine.compare(&task("b", 1, &[]), &task("a", 1, &[])),
            Ordering::Greater
        );
        assert_eq!(
            engine.compare(&task("a", 1, &["x"]), &task("a", 1, &["y"])),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_and_sorted() {
        let engine = ordering();
        let mut items = vec![task("b", 2, &[]), task("a", 2, &[]), task("c", 1, &[])];

        let names: Vec<&str> = engine
            .sorted(&items)
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(!engine.is_sorted(&items));

        engine.sort(&mut items);
        assert!(engine.is_sorted(&items));
        assert_eq!(items[0].name, "c");
    }

    #[test]
    fn min_and_max() {
        let engine = ordering();
        let items = vec![task("b", 2, &[]), task("a", 2, &[]), task("c", 1, &[])];

        assert_eq!(engine.min(&items).map(|t| t.name.as_str()), Some("c"));
        assert_eq!(engine.max(&items).map(|t| t.name.as_str()), Some("b"));
        assert!(engine.min(&[]).is_none());
    }

    #[test]
    fn ordering_engine_derefs_to_equality() {
        let engine = ordering();
        let a = task("a", 1, &["x"]);
        assert!(engine.is_equal(&a, &task("a", 1, &["y"])));
        assert_eq!(engine.len(), 2);
        assert!(engine.is_comparable());
    }

    #[test]
    fn into_equality_round_trips() {
        let engine = ordering().into_equality();
        let promoted = OrderingEngine::try_from(engine);
        assert!(promoted.is_ok());
    }

    #[test]
    fn empty_engine_is_comparable_and_promotes() {
        let engine = builder::<Task>().build().into_equality();
        assert!(engine.is_empty());
        assert!(engine.is_comparable());
        assert!(OrderingEngine::try_from(engine).is_ok());
    }

    #[test]
    fn promotion_fails_without_comparators() {
        let err = OrderingEngine::try_from(equality()).unwrap_err();
        assert_eq!(
            err,
            ParityError::InvalidFieldConfiguration {
                owner: type_name::<Task>(),
                index: 0,
                value_type: type_name::<String>(),
            }
        );
    }

    #[test]
    fn debug_output() {
        let debug = format!("{:?}", ordering());
        assert!(debug.starts_with("OrderingEngine"));
        assert!(debug.contains("i64"));
    }
}
