//! # mrdset - Streamed MR Raw-Data Storage
//!
//! `mrdset` stores MR scanner acquisitions as they stream off the
//! acquisition system: append-only, indexed, and readable back in global
//! arrival order or per stream.
//!
//! ## Key Features
//!
//! - **Self-describing container**: a hierarchy of groups and typed, growable
//!   arrays in a single file. Every array carries the registered layout of
//!   its elements, so files are readable without out-of-band schema.
//!
//! - **Per-stream arrays**: each stream (data, noise, navigator, ...) grows
//!   its own array, one record per acquisition.
//!
//! - **Global index**: one `(stream, offset)` entry per append, so the n-th
//!   acquisition ever written can be found without scanning streams.
//!
//! - **XML header**: the acquisition-parameter document is stored alongside
//!   the data, opaque to this crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mrdset::acquisition::AcquisitionBuilder;
//! use mrdset::dataset::{Dataset, DatasetConfig};
//!
//! let mut dataset = Dataset::open("scan.mrd", DatasetConfig::default())?;
//! dataset.write_header("<ismrmrdHeader/>")?;
//!
//! for line in 0..64u16 {
//!     let mut acq = AcquisitionBuilder::new(256, 8).scan_counter(line.into()).build();
//!     acq.idx_mut().kspace_encode_step_1 = line;
//!     dataset.append_acquisition(&acq, None)?;
//! }
//!
//! // A noise scan on its own stream
//! let noise = AcquisitionBuilder::new(256, 8).build();
//! dataset.append_acquisition(&noise, Some(1))?;
//!
//! assert_eq!(dataset.number_of_acquisitions(None)?, 65);
//! assert_eq!(dataset.number_of_acquisitions(Some(1))?, 1);
//! dataset.close()?;
//! # Ok::<(), mrdset::dataset::DatasetError>(())
//! ```
//!
//! This creates the following hierarchy in `scan.mrd`:
//! ```text
//! /dataset/
//! ├── xml
//! └── data/
//!     ├── index
//!     ├── 0
//!     └── 1
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`container`]: hierarchical container engine (groups, typed growable arrays)
//! - [`schema`]: type descriptors and the registered on-disk layouts
//! - [`record`]: byte encoding of index entries, acquisitions and the header
//! - [`acquisition`]: in-memory acquisitions and their fixed-size header
//! - [`dataset`]: the append/read engine, index and header storage
//! - [`validator`]: structural and index/stream consistency checks
//!
//! ## File Format
//!
//! A `.mrd` file is a ZIP archive:
//!
//! - `mimetype`: `application/vnd.mrdset`, stored uncompressed as the first entry
//! - `manifest.json`: format version, container id, timestamps, and the node tree
//!   with every array's type descriptor, extent and maximum extent
//! - `arrays/<n>.bin`: the encoded elements of array `n`

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod acquisition;
pub mod container;
pub mod dataset;
pub mod record;
pub mod schema;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::acquisition::{
        Acquisition, AcquisitionBuilder, AcquisitionError, AcquisitionHeader, Complex32,
        EncodingCounters,
    };
    pub use crate::container::{AccessMode, Container, ContainerError, ContainerInfo};
    pub use crate::dataset::{Dataset, DatasetConfig, DatasetError};
    pub use crate::record::{AcquisitionRecord, HeaderDocument, IndexEntry, Record, RecordError};
    pub use crate::schema::{
        TypeDescriptor, DEFAULT_GROUP_NAME, MRDSET_FORMAT_VERSION, MRDSET_MIMETYPE,
    };
    pub use crate::validator::{validate_dataset, ValidationReport};
}
