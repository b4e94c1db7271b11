//! Per-field comparators and the absent-first ordering policy.
//!
//! A [`FieldComparator`] wraps a two-argument ordering function for a single
//! field's value type. [`FieldComparator::natural`] is the default used when a
//! comparable field is registered without an explicit comparator.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type CompareFn<V> = dyn Fn(&V, &V) -> Ordering + Send + Sync;

/// Ordering function for the values of one field.
///
/// Comparators are cheap to clone and safe to share between threads.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use standout_parity::FieldComparator;
///
/// // Compare only the first element of a slice-valued field.
/// let first = FieldComparator::new(|a: &[String], b: &[String]| a.first().cmp(&b.first()));
///
/// let a = vec!["apple".to_string(), "zebra".to_string()];
/// let b = vec!["apple".to_string()];
/// assert_eq!(first.compare(&a, &b), Ordering::Equal);
/// ```
pub struct FieldComparator<V: ?Sized> {
    compare: Arc<CompareFn<V>>,
}

impl<V: ?Sized + 'static> FieldComparator<V> {
    /// Creates a comparator from an ordering function.
    ///
    /// The function should define a total order consistent with the field's
    /// equality. Anything else leaves the resulting ordering undefined.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&V, &V) -> Ordering + Send + Sync + 'static,
    {
        FieldComparator {
            compare: Arc::new(compare),
        }
    }

    /// Creates a comparator that orders values by a derived key.
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        FieldComparator::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Compares two field values.
    pub fn compare(&self, a: &V, b: &V) -> Ordering {
        (self.compare)(a, b)
    }

    /// Compares two possibly absent field values, absent first.
    ///
    /// See [`absent_first`].
    pub fn compare_optional(&self, a: Option<&V>, b: Option<&V>) -> Ordering {
        absent_first(a, b, |a, b| self.compare(a, b))
    }

    /// Returns a comparator with the opposite order.
    pub fn reversed(self) -> Self {
        let inner = self.compare;
        FieldComparator::new(move |a, b| inner(a, b).reverse())
    }

    /// Returns a comparator that breaks ties with `next`.
    pub fn then(self, next: FieldComparator<V>) -> Self {
        let first = self.compare;
        FieldComparator::new(move |a, b| first(a, b).then_with(|| next.compare(a, b)))
    }
}

impl<V: Ord + ?Sized + 'static> FieldComparator<V> {
    /// The natural order of `V`.
    ///
    /// For `Option<X>` values this already sorts `None` before any `Some`,
    /// which matches [`absent_first`].
    pub fn natural() -> Self {
        FieldComparator::new(V::cmp)
    }
}

impl<V: Ord + ?Sized + 'static> Default for FieldComparator<V> {
    fn default() -> Self {
        FieldComparator::natural()
    }
}

impl<V: ?Sized> Clone for FieldComparator<V> {
    fn clone(&self) -> Self {
        FieldComparator {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<V: ?Sized> fmt::Debug for FieldComparator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldComparator")
            .field("value_type", &std::any::type_name::<V>())
            .finish_non_exhaustive()
    }
}

/// Orders two possibly absent values, absent sorting first.
///
/// - both absent: `Equal`
/// - only `a` absent: `Less`
/// - only `b` absent: `Greater`
/// - both present: `inner(a, b)`
///
/// ```
/// use std::cmp::Ordering;
/// use standout_parity::absent_first;
///
/// assert_eq!(absent_first(None, Some(&1), i32::cmp), Ordering::Less);
/// assert_eq!(absent_first(Some(&1), None, i32::cmp), Ordering::Greater);
/// assert_eq!(absent_first::<i32, _>(None, None, i32::cmp), Ordering::Equal);
/// assert_eq!(absent_first(Some(&1), Some(&2), i32::cmp), Ordering::Less);
/// ```
pub fn absent_first<V, F>(a: Option<&V>, b: Option<&V>, inner: F) -> Ordering
where
    V: ?Sized,
    F: FnOnce(&V, &V) -> Ordering,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => inner(a, b),
    }
}
