#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unreachable_pub)]

//! The field-delta property bag (C1) that every replicated game object is
//! built on: a fixed-size ordered sequence of 32-bit cells with a per-cell
//! dirty bit, plus the initial/delta serializers consumed by
//! `ironspire_replication`.

pub mod map;
pub mod scalar;

pub use map::FieldMap;
pub use scalar::{FieldScalar, PackedU16x2};
