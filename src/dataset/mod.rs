//! # mrdset Dataset Module
//!
//! [`Dataset`] is the public entry point: it owns one open container, the
//! base group all content lives under, and a cache of open array handles.
//!
//! ## Layout
//!
//! ```text
//! {group_name}/
//! ├── xml             # 1-element string array: the XML header document
//! └── data/
//!     ├── index       # growable array of IndexEntry, one per append
//!     ├── 0           # growable array of acquisition records, stream 0
//!     └── {stream}    # one array per stream, created on first append
//! ```
//!
//! Appending an acquisition writes the record to its stream array first and
//! the index entry second. The two writes are not atomic: a failure between
//! them leaves the stream one record ahead of the index, which
//! [`crate::validator::validate_dataset`] reports.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mrdset::acquisition::AcquisitionBuilder;
//! use mrdset::dataset::{Dataset, DatasetConfig};
//!
//! let mut dataset = Dataset::open("scan.mrd", DatasetConfig::default())?;
//! dataset.write_header("<ismrmrdHeader/>")?;
//!
//! let acq = AcquisitionBuilder::new(256, 8).stream_number(0).build();
//! dataset.append_acquisition(&acq, None)?;
//!
//! let first = dataset.read_acquisition(0, None)?;
//! assert_eq!(first.number_of_samples(), 256);
//! assert_eq!(dataset.number_of_acquisitions(None)?, 1);
//!
//! dataset.close()?;
//! # Ok::<(), mrdset::dataset::DatasetError>(())
//! ```

mod acquisitions;
mod config;
mod error;
mod header;
mod paths;
mod table;


pub use config::DatasetConfig;
pub use error::DatasetError;

use std::path::Path;

use log::{debug, info};

use crate::container::{
    is_recognized_format, normalize_path, AccessMode, Container, ContainerInfo,
};
use crate::schema::{DATA_GROUP_NAME, INDEX_TABLE_NAME, XML_HEADER_NAME};

use table::TableCache;

/// An open acquisition dataset.
///
/// Every operation that may touch the handle cache takes `&mut self`. The
/// dataset is flushed by [`Dataset::close`]; dropping it without closing
/// still flushes pending changes and logs any failure.
pub struct Dataset {
    container: Container,
    group_name: String,
    data_path: String,
    index_path: String,
    xml_path: String,
    tables: TableCache,
}

impl Dataset {
    /// Open (or create) the dataset at `path`.
    ///
    /// - An existing file that is not a container is rejected with
    ///   [`DatasetError::NotAContainer`].
    /// - A missing file is created when `config.create_if_missing` is set and
    ///   is otherwise [`DatasetError::NotFound`].
    ///
    /// The `<group>/data` group is created when absent, unless the dataset
    /// is opened read-only.
    pub fn open<P: AsRef<Path>>(path: P, config: DatasetConfig) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let mode = config.access_mode();

        let container = if path.exists() {
            if !is_recognized_format(path) {
                return Err(DatasetError::NotAContainer(path.display().to_string()));
            }
            Container::open(path, mode)?
        } else if config.create_if_missing {
            // Close the fresh file first so it is complete on disk before reopening
            Container::create(path)?.close()?;
            Container::open(path, mode)?
        } else {
            return Err(DatasetError::NotFound(path.display().to_string()));
        };

        let group_name = config.base_path();
        let data_path = normalize_path(&format!("{}/{}", group_name, DATA_GROUP_NAME));
        let index_path = format!("{}/{}", data_path, INDEX_TABLE_NAME);
        let xml_path = normalize_path(&format!("{}/{}", group_name, XML_HEADER_NAME));

        let mut dataset = Self {
            container,
            group_name,
            data_path,
            index_path,
            xml_path,
            tables: TableCache::default(),
        };

        if mode == AccessMode::ReadWrite {
            let data_path = dataset.data_path.clone();
            dataset.ensure_group(&data_path)?;
        } else if !dataset.exists(&dataset.data_path) {
            debug!(
                "Read-only dataset {} has no {} group",
                path.display(),
                dataset.data_path
            );
        }

        info!("Opened dataset {} at {}", path.display(), dataset.group_name);
        Ok(dataset)
    }

    /// File backing this dataset
    pub fn path(&self) -> &Path {
        self.container.path()
    }

    /// Provenance recorded in the container manifest
    pub fn info(&self) -> &ContainerInfo {
        self.container.info()
    }

    /// Base group of this dataset
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Whether the dataset was opened read-only
    pub fn is_read_only(&self) -> bool {
        self.container.mode() == AccessMode::ReadOnly
    }

    /// Whether every prefix of `path` exists in the container
    pub fn exists(&self, path: &str) -> bool {
        paths::exists(&self.container, path)
    }

    /// Create `path` and any missing parent groups. Idempotent.
    pub fn ensure_group(&mut self, path: &str) -> Result<(), DatasetError> {
        paths::ensure_group(&mut self.container, path)
    }

    /// Persist pending changes without closing
    pub fn flush(&mut self) -> Result<(), DatasetError> {
        self.container.flush()?;
        Ok(())
    }

    /// Flush, invalidate cached handles and release the container
    pub fn close(mut self) -> Result<(), DatasetError> {
        debug!("Releasing {} cached array handles", self.tables.len());
        self.tables.clear();
        self.container.close()?;
        Ok(())
    }

    fn stream_path(&self, stream: u32) -> String {
        format!("{}/{}", self.data_path, stream)
    }
}
