//! # mrdset Schema Registry
//!
//! This module declares the on-disk layouts of every record kind stored in an
//! mrdset container, expressed as [`TypeDescriptor`] values.
//!
//! A descriptor is used twice: when an array is created it declares the
//! element type, and when an existing array is opened the stored descriptor
//! must be structurally equal to the registered one. A mismatch is a hard
//! error, never a coercion.
//!
//! ## Record Layouts
//!
//! | Record | Path | Fixed size |
//! |--------|------|------------|
//! | `IndexEntry` | `<base>/data/index` | 8 bytes |
//! | `AcquisitionRecord` | `<base>/data/<stream>` | 376 bytes + heap |
//! | XML header | `<base>/xml` | 16 bytes + heap |
//!
//! Offsets are packed: each field starts where the previous one ends.
//! Variable-length fields occupy a 16-byte slot (`u64` count, `u64` heap
//! offset) and store their values in a heap appended after the fixed part.

mod constants;
mod descriptor;
mod layouts;

#[cfg(test)]
mod tests;

pub use constants::*;
pub use descriptor::{
    CompoundBuilder, CompoundType, Field, PrimitiveKind, TypeDescriptor, VARLEN_SLOT_SIZE,
};
pub use layouts::{
    acquisition_header_layout, acquisition_record_layout, encoding_counters_layout,
    index_entry_layout, xml_header_layout,
};
