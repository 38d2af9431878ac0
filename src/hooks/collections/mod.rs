//! Collection-state containers.
//!
//! Array, map, and set hooks that hold an immutable snapshot of a native
//! collection and expose CRUD-style operations. Every operation that changes
//! anything swaps in a new `Arc` snapshot; operations that would change
//! nothing short-circuit and keep the existing snapshot, so downstream
//! reactions can use pointer equality to skip redundant work.

mod array;
mod map;
mod set;

pub use array::{use_array, ArrayState};
pub use map::{use_map, MapState};
pub use set::{use_set, SetState};
