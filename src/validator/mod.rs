//! # mrdset Validation Module
//!
//! Consistency validation for `.mrd` containers. Appending an acquisition
//! writes its stream array and the global index in two separate steps, so a
//! failed append can leave a stream longer than the index says. This module
//! finds that drift along with structural and type problems.
//!
//! ## Validation Checklist
//!
//! 1. **Structure Check**: recognized container, readable manifest, data group present
//! 2. **Schema Contract**: index and stream arrays carry the registered layouts and rank
//! 3. **Index Consistency**: index length matches the stream lengths, every entry
//!    points inside its stream
//! 4. **Record Sanity**: every stored acquisition decodes and its payload lengths
//!    agree with its header
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mrdset::validator::validate_dataset;
//! use std::path::Path;
//!
//! let result = validate_dataset(Path::new("scan.mrd"), "/dataset");
//! match result {
//!     Ok(report) => {
//!         println!("{}", report);
//!     }
//!     Err(e) => {
//!         eprintln!("Validation failed: {}", e);
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::container::{normalize_path, ArrayHandle};
use crate::schema::{DATA_GROUP_NAME, INDEX_TABLE_NAME, XML_HEADER_NAME};

pub use report::{CheckCounts, CheckStatus, ValidationCheck, ValidationReport};

mod consistency;
mod report;
mod schema;
mod structure;

#[cfg(test)]
mod tests;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Error in file or container structure
    #[error("Structure error: {0}")]
    StructureError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the container engine
    #[error("Container error: {0}")]
    ContainerError(#[from] crate::container::ContainerError),
}

/// Paths of the dataset under validation
#[derive(Debug)]
pub(crate) struct DatasetPaths {
    pub(crate) data: String,
    pub(crate) index: String,
    pub(crate) xml: String,
}

impl DatasetPaths {
    fn new(group_name: &str) -> Self {
        let base = normalize_path(group_name);
        let data = normalize_path(&format!("{}/{}", base, DATA_GROUP_NAME));
        Self {
            index: format!("{}/{}", data, INDEX_TABLE_NAME),
            xml: normalize_path(&format!("{}/{}", base, XML_HEADER_NAME)),
            data,
        }
    }
}

/// Arrays that passed the schema contract
#[derive(Debug, Default)]
pub(crate) struct CheckedArrays {
    pub(crate) index: Option<ArrayHandle>,
    pub(crate) streams: BTreeMap<u32, ArrayHandle>,
}

/// Main validation entry point.
///
/// Problems with the dataset are recorded in the returned report; `Err` is
/// reserved for failures to read the file at all.
pub fn validate_dataset(path: &Path, group_name: &str) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());
    let paths = DatasetPaths::new(group_name);

    // 1. Structure Check
    let Some(container) = structure::check_structure(path, &paths, &mut report)? else {
        return Ok(report);
    };

    // 2. Schema Contract Check
    let arrays = schema::check_schema_contract(&container, &paths, &mut report)?;

    // 3. Index Consistency Check
    consistency::check_index_consistency(&container, &arrays, &mut report)?;

    // 4. Record Sanity Check
    consistency::check_record_sanity(&container, &arrays, &mut report)?;

    Ok(report)
}
