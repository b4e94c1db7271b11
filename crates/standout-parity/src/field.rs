//! Field descriptors: one registered extractor, type-erased.
//!
//! A [`FieldDescriptor`] captures everything an engine needs to know about a
//! single field of the owner type `T`: how to test two extracted values for
//! equality, how to hash one, and (for comparable fields) how to order two.
//! The extractor's value type disappears behind shared closures at
//! registration, so an engine can hold fields of many value types in one
//! ordered list.

use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::comparator::FieldComparator;

pub(crate) type EqFn<T> = dyn Fn(&T, &T) -> bool + Send + Sync;
pub(crate) type HashFn<T> = dyn Fn(&T) -> u64 + Send + Sync;
pub(crate) type CmpFn<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// Hash contribution of an absent optional field.
pub const ABSENT_HASH: u64 = 0;

/// Hashes a single present field value.
///
/// The value's [`Hash`] impl is fed into an unseeded [`FxHasher`], so the
/// result is deterministic across runs and recurses into whatever the value's
/// `Hash` impl recurses into (slices, vectors, options, derived structs).
pub fn hash_of<V: Hash + ?Sized>(value: &V) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A registered field of the owner type `T`.
///
/// Descriptors are created by the builders and are immutable afterwards.
/// Two descriptors are distinct even when their extractors behave the same.
pub struct FieldDescriptor<T> {
    value_type: &'static str,
    optional: bool,
    eq: Arc<EqFn<T>>,
    hash: Arc<HashFn<T>>,
    cmp: Option<Arc<CmpFn<T>>>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// An equality-only field.
    pub(crate) fn new<V, F>(extractor: F) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        FieldDescriptor::from_shared::<V, F>(Arc::new(extractor))
    }

    /// A field ordered by `comparator`.
    pub(crate) fn comparable<V, F>(extractor: F, comparator: FieldComparator<V>) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let extractor = Arc::new(extractor);
        let cmp_extractor = Arc::clone(&extractor);
        let cmp: Arc<CmpFn<T>> = Arc::new(move |a: &T, b: &T| {
            comparator.compare(cmp_extractor(a), cmp_extractor(b))
        });

        FieldDescriptor {
            cmp: Some(cmp),
            ..FieldDescriptor::from_shared::<V, F>(extractor)
        }
    }

    /// A field whose value may be absent, ordered absent-first.
    pub(crate) fn optional<V, F>(extractor: F, comparator: FieldComparator<V>) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        let extractor = Arc::new(extractor);
        let eq_extractor = Arc::clone(&extractor);
        let hash_extractor = Arc::clone(&extractor);

        FieldDescriptor {
            value_type: type_name::<V>(),
            optional: true,
            eq: Arc::new(move |a: &T, b: &T| eq_extractor(a) == eq_extractor(b)),
            hash: Arc::new(move |value: &T| hash_extractor(value).map_or(ABSENT_HASH, hash_of)),
            cmp: Some(Arc::new(move |a: &T, b: &T| {
                comparator.compare_optional(extractor(a), extractor(b))
            })),
        }
    }

    fn from_shared<V, F>(extractor: Arc<F>) -> Self
    where
        V: PartialEq + Hash + ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let eq_extractor = Arc::clone(&extractor);

        FieldDescriptor {
            value_type: type_name::<V>(),
            optional: false,
            eq: Arc::new(move |a: &T, b: &T| eq_extractor(a) == eq_extractor(b)),
            hash: Arc::new(move |value: &T| hash_of(extractor(value))),
            cmp: None,
        }
    }
}

impl<T> FieldDescriptor<T> {
    /// Drops the comparator, keeping equality and hashing.
    pub(crate) fn demoted(self) -> Self {
        FieldDescriptor { cmp: None, ..self }
    }

    pub(crate) fn comparator(&self) -> Option<&Arc<CmpFn<T>>> {
        self.cmp.as_ref()
    }

    /// Type name of the extracted value.
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// Returns `true` if the field was registered as optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns `true` if the field carries a comparator.
    pub fn is_comparable(&self) -> bool {
        self.cmp.is_some()
    }

    /// Tests the field values of two items for deep equality.
    pub fn values_equal(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    /// Hash contribution of this field for one item.
    pub fn hash_value(&self, item: &T) -> u64 {
        (self.hash)(item)
    }

    /// Compares the field values of two items.
    ///
    /// Returns `None` if the field carries no comparator.
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        self.cmp.as_ref().map(|cmp| cmp(a, b))
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        FieldDescriptor {
            value_type: self.value_type,
            optional: self.optional,
            eq: Arc::clone(&self.eq),
            hash: Arc::clone(&self.hash),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("value_type", &self.value_type)
            .field("optional", &self.optional)
            .field("comparable", &self.is_comparable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
        tags: Vec<String>,
        note: Option<String>,
    }

    fn item(name: &str, tags: &[&str], note: Option<&str>) -> Item {
        Item {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            note: note.map(String::from),
        }
    }

    #[test]
    fn hash_of_is_deterministic() {
        assert_eq!(hash_of("abc"), hash_of(&"abc".to_string()));
        assert_eq!(hash_of(&[1u32, 2, 3][..]), hash_of(&vec![1u32, 2, 3][..]));
        assert_ne!(hash_of("abc"), hash_of("abd"));
    }

    #[test]
    fn plain_field_equality_is_deep() {
        let field = FieldDescriptor::new(|i: &Item| &i.tags);
        let a = item("a", &["x", "y"], None);
        let b = item("b", &["x", "y"], None);
        let c = item("c", &["x"], None);

        assert!(field.values_equal(&a, &b));
        assert!(!field.values_equal(&a, &c));
        assert_eq!(field.hash_value(&a), field.hash_value(&b));
        assert!(!field.is_comparable());
        assert_eq!(field.compare(&a, &b), None);
    }

    #[test]
    fn unsized_field_values() {
        let field = FieldDescriptor::new(|i: &Item| i.name.as_str());
        assert_eq!(field.value_type(), "str");
        assert!(field.values_equal(&item("a", &[], None), &item("a", &["z"], None)));
    }

    #[test]
    fn comparable_field_orders() {
        let field = FieldDescriptor::comparable(|i: &Item| &i.name, FieldComparator::natural());
        let a = item("a", &[], None);
        let b = item("b", &[], None);

        assert!(field.is_comparable());
        assert_eq!(field.compare(&a, &b), Some(Ordering::Less));
        assert_eq!(field.compare(&b, &a), Some(Ordering::Greater));
    }

    #[test]
    fn optional_field_absent_first() {
        let field = FieldDescriptor::optional(|i: &Item| i.note.as_deref(), FieldComparator::natural());
        let absent = item("a", &[], None);
        let present = item("a", &[], Some("x"));

        assert!(field.is_optional());
        assert_eq!(field.compare(&absent, &present), Some(Ordering::Less));
        assert_eq!(field.compare(&present, &absent), Some(Ordering::Greater));
        assert_eq!(field.compare(&absent, &absent), Some(Ordering::Equal));
        assert_eq!(field.hash_value(&absent), ABSENT_HASH);
        assert!(!field.values_equal(&absent, &present));
    }

    #[test]
    fn demoted_keeps_equality() {
        let field = FieldDescriptor::comparable(|i: &Item| &i.name, FieldComparator::natural()).demoted();
        let a = item("a", &[], None);

        assert!(!field.is_comparable());
        assert!(field.values_equal(&a, &item("a", &["q"], None)));
    }

    #[test]
    fn debug_output() {
        let field = FieldDescriptor::new(|i: &Item| &i.name);
        let debug = format!("{field:?}");
        assert!(debug.contains("String"));
        assert!(debug.contains("comparable: false"));
    }
}
