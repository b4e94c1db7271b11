//! Trait wiring for types that delegate to an engine.
//!
//! The engine expression is evaluated on every call, so it is normally a
//! path to a lazily initialised `static`.

/// Implements `PartialEq`, `Eq` and `Hash` for a type by delegating to an
/// [`EqualityEngine`](crate::EqualityEngine) (or anything that dereferences
/// to one).
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use once_cell::sync::Lazy;
/// use standout_parity::{builder, impl_equality, EqualityEngine};
///
/// struct Tag {
///     name: String,
///     color: Option<u32>,
/// }
///
/// static TAG_EQUALITY: Lazy<EqualityEngine<Tag>> = Lazy::new(|| {
///     builder::<Tag>()
///         .add_field(|t: &Tag| &t.name)
///         .add_field(|t: &Tag| &t.color)
///         .build()
/// });
///
/// impl_equality!(Tag, TAG_EQUALITY);
///
/// let mut tags = HashSet::new();
/// tags.insert(Tag { name: "bug".into(), color: None });
/// tags.insert(Tag { name: "bug".into(), color: None });
/// assert_eq!(tags.len(), 1);
/// ```
#[macro_export]
macro_rules! impl_equality {
    ($ty:ty, $engine:expr) => {
        impl ::core::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $engine.equals(self, other)
            }
        }

        impl ::core::cmp::Eq for $ty {}

        impl ::core::hash::Hash for $ty {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                $engine.hash_into(self, state)
            }
        }
    };
}

/// Implements `PartialEq`, `Eq`, `Hash`, `PartialOrd` and `Ord` for a type by
/// delegating to an [`OrderingEngine`](crate::OrderingEngine).
///
/// # Example
///
/// ```
/// use once_cell::sync::Lazy;
/// use standout_parity::{builder, impl_ordering, OrderingEngine};
///
/// struct Version {
///     major: u32,
///     minor: u32,
/// }
///
/// static VERSION_ORDER: Lazy<OrderingEngine<Version>> = Lazy::new(|| {
///     builder::<Version>()
///         .add_comparable_field(|v: &Version| &v.major)
///         .add_comparable_field(|v: &Version| &v.minor)
///         .build()
/// });
///
/// impl_ordering!(Version, VERSION_ORDER);
///
/// let mut versions = vec![
///     Version { major: 1, minor: 4 },
///     Version { major: 0, minor: 9 },
///     Version { major: 1, minor: 0 },
/// ];
/// versions.sort();
/// assert_eq!((versions[0].major, versions[0].minor), (0, 9));
/// assert!(Version { major: 1, minor: 0 } == Version { major: 1, minor: 0 });
/// ```
#[macro_export]
macro_rules! impl_ordering {
    ($ty:ty, $engine:expr) => {
        $crate::impl_equality!($ty, $engine);

        impl ::core::cmp::PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some(::core::cmp::Ord::cmp(self, other))
            }
        }

        impl ::core::cmp::Ord for $ty {
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                $engine.compare(self, other)
            }
        }
    };
}
