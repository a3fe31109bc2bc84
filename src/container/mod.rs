//! # Hierarchical Container Engine
//!
//! A minimal self-describing hierarchical store: a tree of groups and typed,
//! chunked, growable arrays addressed by slash-delimited paths. It provides
//! exactly the capabilities the dataset layer consumes:
//!
//! - test for link existence and kind
//! - create groups
//! - create/open an array with a [`TypeDescriptor`], extent and maximum extent
//! - extend an array, write/read hyperslabs, report extent and element type
//!
//! The whole hierarchy is held in memory while the container is open and is
//! written to a ZIP archive (see the `archive` module layout) on
//! [`Container::flush`], [`Container::close`], or when a modified container
//! is dropped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mrdset::container::{AccessMode, Container};
//! use mrdset::schema::{PrimitiveKind, TypeDescriptor};
//!
//! let mut file = Container::create("scan.mrd")?;
//! file.create_group("/dataset")?;
//!
//! let dtype = TypeDescriptor::primitive(PrimitiveKind::U32);
//! let array = file.create_array("/dataset/counts", &dtype, &[1], &[None], &[1])?;
//! file.write_hyperslab(array, &[0], &[1], vec![7u32.to_le_bytes().to_vec()])?;
//! file.close()?;
//!
//! let file = Container::open("scan.mrd", AccessMode::ReadOnly)?;
//! let array = file.open_array("/dataset/counts")?;
//! assert_eq!(file.extent(array)?, &[1]);
//! # Ok::<(), mrdset::container::ContainerError>(())
//! ```

mod archive;
mod error;
mod node;

#[cfg(test)]
mod tests;

pub use archive::{is_recognized_format, ContainerInfo};
pub use error::ContainerError;
pub use node::{AccessMode, ArrayHandle, NodeKind};

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::schema::TypeDescriptor;

use archive::ContainerState;
use node::{ArrayData, Node};

/// Normalize a slash-delimited path: leading `/`, no empty segments
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn parent_path(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(i) => Some(path[..i].to_string()),
        None => None,
    }
}

/// An open container file
pub struct Container {
    path: PathBuf,
    mode: AccessMode,
    state: ContainerState,
    dirty: bool,
    closed: bool,
}

impl Container {
    /// Create a new, empty container at `path`, replacing any existing file.
    ///
    /// The empty container is written to disk immediately so the file is a
    /// recognized container as soon as this returns.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(ContainerError::InvalidPath("Empty path".to_string()));
        }

        let state = ContainerState::empty();
        archive::save(&path, &state)?;
        info!("Created container {}", path.display());

        Ok(Self {
            path,
            mode: AccessMode::ReadWrite,
            state,
            dirty: false,
            closed: false,
        })
    }

    /// Open an existing container
    pub fn open<P: AsRef<Path>>(path: P, mode: AccessMode) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ContainerError::NotFound(path.display().to_string()));
        }

        let state = archive::load(&path)?;
        info!(
            "Opened container {} ({:?}, {} arrays)",
            path.display(),
            mode,
            state.arrays.len()
        );

        Ok(Self {
            path,
            mode,
            state,
            dirty: false,
            closed: false,
        })
    }

    /// File this container is backed by
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Access mode the container was opened with
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Container provenance from the manifest
    pub fn info(&self) -> &ContainerInfo {
        &self.state.info
    }

    /// Whether a link exists at exactly `path`
    pub fn link_exists(&self, path: &str) -> bool {
        self.state.nodes.contains_key(&normalize_path(path))
    }

    /// Kind of the link at `path`, if any
    pub fn node_kind(&self, path: &str) -> Option<NodeKind> {
        self.state.nodes.get(&normalize_path(path)).map(Node::kind)
    }

    /// Names of the direct children of the group at `path`
    pub fn children(&self, path: &str) -> Result<Vec<String>, ContainerError> {
        let path = normalize_path(path);
        match self.state.nodes.get(&path) {
            None => return Err(ContainerError::NotFound(path)),
            Some(Node::Array(_)) => return Err(ContainerError::PathConflict(path)),
            Some(Node::Group) => {}
        }

        Ok(self
            .state
            .nodes
            .keys()
            .filter(|p| parent_path(p).as_deref() == Some(path.as_str()))
            .filter_map(|p| p.rsplit('/').next().map(str::to_string))
            .collect())
    }

    /// Create a group; its parent must already exist
    pub fn create_group(&mut self, path: &str) -> Result<(), ContainerError> {
        self.ensure_writable()?;
        let path = normalize_path(path);
        self.check_new_link(&path)?;

        self.state.nodes.insert(path.clone(), Node::Group);
        self.dirty = true;
        debug!("Created group {}", path);
        Ok(())
    }

    /// Create a typed array.
    ///
    /// `max_extent` entries of `None` mark unlimited axes. All three shape
    /// slices must have the same rank.
    pub fn create_array(
        &mut self,
        path: &str,
        dtype: &TypeDescriptor,
        extent: &[u64],
        max_extent: &[Option<u64>],
        chunk: &[u64],
    ) -> Result<ArrayHandle, ContainerError> {
        self.ensure_writable()?;
        let path = normalize_path(path);
        self.check_new_link(&path)?;

        if extent.len() != max_extent.len() || extent.len() != chunk.len() {
            return Err(ContainerError::InvalidExtent(format!(
                "rank disagreement: extent {:?}, max {:?}, chunk {:?}",
                extent, max_extent, chunk
            )));
        }
        check_within_max(extent, max_extent)?;
        let len = storage_len(extent)?;

        let handle = ArrayHandle(self.state.arrays.len());
        self.state.arrays.push(ArrayData {
            path: path.clone(),
            dtype: dtype.clone(),
            extent: extent.to_vec(),
            max_extent: max_extent.to_vec(),
            chunk: chunk.to_vec(),
            elements: vec![None; len],
        });
        self.state.nodes.insert(path.clone(), Node::Array(handle));
        self.dirty = true;
        debug!("Created array {} with extent {:?}", path, extent);
        Ok(handle)
    }

    /// Open an existing array
    pub fn open_array(&self, path: &str) -> Result<ArrayHandle, ContainerError> {
        let path = normalize_path(path);
        match self.state.nodes.get(&path) {
            Some(Node::Array(handle)) => Ok(*handle),
            Some(Node::Group) => Err(ContainerError::PathConflict(format!(
                "{} is a group, not an array",
                path
            ))),
            None => Err(ContainerError::NotFound(path)),
        }
    }

    /// Element type of an array
    pub fn type_of(&self, handle: ArrayHandle) -> Result<&TypeDescriptor, ContainerError> {
        Ok(&self.array(handle)?.dtype)
    }

    /// Current extent of an array
    pub fn extent(&self, handle: ArrayHandle) -> Result<&[u64], ContainerError> {
        Ok(&self.array(handle)?.extent)
    }

    /// Maximum extent of an array (`None` = unlimited)
    pub fn max_extent(&self, handle: ArrayHandle) -> Result<&[Option<u64>], ContainerError> {
        Ok(&self.array(handle)?.max_extent)
    }

    /// Chunk shape of an array
    pub fn chunk(&self, handle: ArrayHandle) -> Result<&[u64], ContainerError> {
        Ok(&self.array(handle)?.chunk)
    }

    /// Path of the array behind `handle`
    pub fn array_path(&self, handle: ArrayHandle) -> Result<&str, ContainerError> {
        Ok(&self.array(handle)?.path)
    }

    /// Grow an array to `new_extent`.
    ///
    /// Only the first axis may change, and it may only grow.
    pub fn extend_array(
        &mut self,
        handle: ArrayHandle,
        new_extent: &[u64],
    ) -> Result<(), ContainerError> {
        self.ensure_writable()?;
        let array = self.array_mut(handle)?;

        if new_extent.len() != array.extent.len() || new_extent.is_empty() {
            return Err(ContainerError::InvalidExtent(format!(
                "cannot change rank of {} from {} to {}",
                array.path,
                array.extent.len(),
                new_extent.len()
            )));
        }
        if new_extent[1..] != array.extent[1..] {
            return Err(ContainerError::InvalidExtent(format!(
                "only the first axis of {} may change ({:?} -> {:?})",
                array.path, array.extent, new_extent
            )));
        }
        if new_extent[0] < array.extent[0] {
            return Err(ContainerError::InvalidExtent(format!(
                "{} cannot shrink from {} to {}",
                array.path, array.extent[0], new_extent[0]
            )));
        }
        check_within_max(new_extent, &array.max_extent)?;

        let new_len = storage_len(new_extent)?;
        array.elements.resize(new_len, None);
        array.extent = new_extent.to_vec();
        self.dirty = true;
        Ok(())
    }

    /// Write `elements` (row-major) into the hyperslab at `offset` of shape `count`
    pub fn write_hyperslab(
        &mut self,
        handle: ArrayHandle,
        offset: &[u64],
        count: &[u64],
        elements: Vec<Vec<u8>>,
    ) -> Result<(), ContainerError> {
        self.ensure_writable()?;
        let array = self.array_mut(handle)?;
        check_slab(array, offset, count)?;

        let positions = array.slab_positions(offset, count);
        if positions.len() != elements.len() {
            return Err(ContainerError::OutOfBounds(format!(
                "selection of {} elements given {} values",
                positions.len(),
                elements.len()
            )));
        }

        let fixed = array.dtype.size();
        let variable = array.dtype.is_variable();
        for bytes in &elements {
            let fits = if variable {
                bytes.len() >= fixed
            } else {
                bytes.len() == fixed
            };
            if !fits {
                return Err(ContainerError::ElementSize {
                    expected: fixed,
                    actual: bytes.len(),
                });
            }
        }

        for (pos, bytes) in positions.into_iter().zip(elements) {
            array.elements[pos] = Some(bytes);
        }
        self.dirty = true;
        Ok(())
    }

    /// Read the hyperslab at `offset` of shape `count` (row-major).
    ///
    /// Elements that were never written read as zero-filled fixed parts.
    pub fn read_hyperslab(
        &self,
        handle: ArrayHandle,
        offset: &[u64],
        count: &[u64],
    ) -> Result<Vec<Vec<u8>>, ContainerError> {
        let array = self.array(handle)?;
        check_slab(array, offset, count)?;

        let fill = vec![0u8; array.dtype.size()];
        Ok(array
            .slab_positions(offset, count)
            .into_iter()
            .map(|pos| array.elements[pos].clone().unwrap_or_else(|| fill.clone()))
            .collect())
    }

    /// Persist the in-memory state if anything changed
    pub fn flush(&mut self) -> Result<(), ContainerError> {
        if self.mode == AccessMode::ReadOnly || !self.dirty {
            return Ok(());
        }
        self.state.info.modified = chrono::Utc::now();
        archive::save(&self.path, &self.state)?;
        self.dirty = false;
        debug!("Flushed container {}", self.path.display());
        Ok(())
    }

    /// Flush and release the container
    pub fn close(mut self) -> Result<(), ContainerError> {
        let result = self.flush();
        self.closed = true;
        info!("Closed container {}", self.path.display());
        result
    }

    fn ensure_writable(&self) -> Result<(), ContainerError> {
        match self.mode {
            AccessMode::ReadOnly => Err(ContainerError::ReadOnly),
            AccessMode::ReadWrite => Ok(()),
        }
    }

    fn check_new_link(&self, path: &str) -> Result<(), ContainerError> {
        if self.state.nodes.contains_key(path) {
            return Err(ContainerError::AlreadyExists(path.to_string()));
        }
        let parent = parent_path(path).ok_or_else(|| ContainerError::InvalidPath(path.to_string()))?;
        match self.state.nodes.get(&parent) {
            Some(Node::Group) => Ok(()),
            Some(Node::Array(_)) => Err(ContainerError::PathConflict(format!(
                "parent {} of {} is an array",
                parent, path
            ))),
            None => Err(ContainerError::NotFound(parent)),
        }
    }

    fn array(&self, handle: ArrayHandle) -> Result<&ArrayData, ContainerError> {
        self.state.arrays.get(handle.0).ok_or(ContainerError::InvalidHandle)
    }

    fn array_mut(&mut self, handle: ArrayHandle) -> Result<&mut ArrayData, ContainerError> {
        self.state
            .arrays
            .get_mut(handle.0)
            .ok_or(ContainerError::InvalidHandle)
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            warn!("Failed to flush container {} on drop: {}", self.path.display(), e);
        }
    }
}

/// Element slots needed to hold `extent`
fn storage_len(extent: &[u64]) -> Result<usize, ContainerError> {
    ArrayData::element_count(extent)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ContainerError::InvalidExtent(format!("extent {:?} is too large", extent)))
}

pub(super) fn check_within_max(
    extent: &[u64],
    max_extent: &[Option<u64>],
) -> Result<(), ContainerError> {
    for (axis, (len, max)) in extent.iter().zip(max_extent).enumerate() {
        if let Some(max) = max {
            if len > max {
                return Err(ContainerError::InvalidExtent(format!(
                    "axis {} extent {} exceeds maximum {}",
                    axis, len, max
                )));
            }
        }
    }
    Ok(())
}

fn check_slab(array: &ArrayData, offset: &[u64], count: &[u64]) -> Result<(), ContainerError> {
    let rank = array.extent.len();
    if offset.len() != rank || count.len() != rank {
        return Err(ContainerError::OutOfBounds(format!(
            "selection rank {}/{} does not match array rank {} of {}",
            offset.len(),
            count.len(),
            rank,
            array.path
        )));
    }
    for axis in 0..rank {
        if offset[axis].saturating_add(count[axis]) > array.extent[axis] {
            return Err(ContainerError::OutOfBounds(format!(
                "axis {} selection {}+{} exceeds extent {} of {}",
                axis, offset[axis], count[axis], array.extent[axis], array.path
            )));
        }
    }
    Ok(())
}
