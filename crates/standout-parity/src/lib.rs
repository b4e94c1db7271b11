//! Parity - Field-driven equality, hashing and ordering for Rust structs.
//!
//! Parity derives `equals`, a combined hash, and optionally a total order
//! from an ordered list of field extractors, and keeps the three consistent:
//! items that are equal always hash identically and compare as `Equal`.
//!
//! - Fields are registered explicitly, one extractor closure per field
//! - Equality is deep: slices, vectors, options and nested structs compare
//!   by content
//! - Ordering is lexicographic over the fields, in registration order
//! - Optional fields sort absent values first
//! - Engines are immutable and `Send + Sync`; build once, share everywhere
//!
//! # Quick Start
//!
//! ```rust
//! use std::cmp::Ordering;
//! use standout_parity::builder;
//!
//! struct Task {
//!     project: String,
//!     due: Option<u32>,
//!     labels: Vec<String>,
//! }
//!
//! let engine = builder::<Task>()
//!     .add_comparable_field(|t: &Task| t.project.as_str())
//!     .add_optional_comparable_field(|t: &Task| t.due.as_ref())
//!     .build();
//!
//! let someday = Task { project: "docs".into(), due: None, labels: vec![] };
//! let friday = Task { project: "docs".into(), due: Some(5), labels: vec![] };
//!
//! // Absent sorts first.
//! assert_eq!(engine.compare(&someday, &friday), Ordering::Less);
//! assert!(!engine.is_equal(&someday, &friday));
//!
//! // Equal items hash the same.
//! let also_friday = Task { project: "docs".into(), due: Some(5), labels: vec!["x".into()] };
//! assert!(engine.is_equal(&friday, &also_friday));
//! assert_eq!(engine.to_hash_code(&friday), engine.to_hash_code(&also_friday));
//! ```
//!
//! # Builder States
//!
//! ```text
//! builder()                      -> Builder            (no fields)
//!   .add_field(..)               -> EqualityBuilder    -> build() -> EqualityEngine
//!   .add_comparable_field(..)    -> ComparableBuilder  -> build() -> OrderingEngine
//! ComparableBuilder.add_field(..) -> EqualityBuilder   (comparable fields demoted)
//! ```
//!
//! # Field Kinds
//!
//! | Registration | Extractor | Ordering |
//! |--------------|-----------|----------|
//! | `add_field` | `Fn(&T) -> &V` | none |
//! | `add_comparable_field` | `Fn(&T) -> &V`, `V: Ord` | natural |
//! | `add_comparable_field_with` | `Fn(&T) -> &V` | [`FieldComparator`] |
//! | `add_optional_comparable_field` | `Fn(&T) -> Option<&V>`, `V: Ord` | absent first, natural |
//! | `add_optional_comparable_field_with` | `Fn(&T) -> Option<&V>` | absent first, [`FieldComparator`] |
//!
//! A comparable field needs an order. Types without a natural order are
//! rejected when the field is registered:
//!
//! ```compile_fail
//! use standout_parity::builder;
//!
//! struct Reading {
//!     celsius: f64,
//! }
//!
//! let engine = builder::<Reading>()
//!     .add_comparable_field(|r: &Reading| &r.celsius)
//!     .build();
//! ```

mod builder;
mod comparator;
mod engine;
mod error;
mod field;
mod macros;

// Re-export public API
pub use builder::{builder, Builder, ComparableBuilder, EqualityBuilder};
pub use comparator::{absent_first, FieldComparator};
pub use engine::{EqualityEngine, OrderingEngine, Owner};
pub use error::{ParityError, Result};
pub use field::{hash_of, FieldDescriptor, ABSENT_HASH};
