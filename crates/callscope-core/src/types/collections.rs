//! Re-exports of the collection types used across callscope.
//!
//! Hash collections for lookups that never leak iteration order; ordered
//! collections wherever iteration order reaches output.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec for declared parameters (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec for resolution candidates (usually 1 or 2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
