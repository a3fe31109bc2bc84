//! Append/read engine over growable arrays of one [`Record`] kind.
//!
//! Every table grows along axis 0, one record per append. The trailing axes
//! are fixed by the element shape the table was created with.

use std::collections::HashMap;

use log::debug;

use crate::container::{normalize_path, ArrayHandle, Container};
use crate::record::Record;

use super::paths;
use super::DatasetError;

/// Open-handle cache keyed by normalized array path
#[derive(Debug, Default)]
pub(crate) struct TableCache {
    handles: HashMap<String, ArrayHandle>,
}

impl TableCache {
    pub(crate) fn clear(&mut self) {
        self.handles.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    /// Resolve a cached or existing array, verifying its element type.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`. Cached handles are
    /// checked too, so a warm cache fails the same way a cold one does.
    fn lookup<R: Record>(
        &mut self,
        container: &Container,
        path: &str,
    ) -> Result<Option<ArrayHandle>, DatasetError> {
        if let Some(handle) = self.handles.get(path).copied() {
            check_type::<R>(container, path, handle)?;
            return Ok(Some(handle));
        }
        if !paths::exists(container, path) {
            return Ok(None);
        }

        let handle = container.open_array(path)?;
        check_type::<R>(container, path, handle)?;

        debug!("Opened table {}", path);
        self.handles.insert(path.to_string(), handle);
        Ok(Some(handle))
    }

    /// Append one record; returns the new length along axis 0
    pub(crate) fn append<R: Record>(
        &mut self,
        container: &mut Container,
        path: &str,
        element_shape: &[u64],
        value: &R,
    ) -> Result<u64, DatasetError> {
        let path = normalize_path(path);
        let rank = element_shape.len();
        if rank == 0 {
            return Err(DatasetError::RankMismatch {
                path,
                expected: 1,
                actual: 0,
            });
        }
        let bytes = value.encode();

        let Some(handle) = self.lookup::<R>(container, &path)? else {
            let mut max_extent: Vec<Option<u64>> = element_shape.iter().copied().map(Some).collect();
            max_extent[0] = None;
            let handle = container.create_array(
                &path,
                R::type_descriptor(),
                element_shape,
                &max_extent,
                element_shape,
            )?;
            container.write_hyperslab(handle, &vec![0; rank], element_shape, vec![bytes])?;
            debug!("Created table {}", path);
            self.handles.insert(path, handle);
            return Ok(element_shape[0]);
        };

        let mut extent = container.extent(handle)?.to_vec();
        if extent.len() != rank {
            return Err(DatasetError::RankMismatch {
                path,
                expected: rank,
                actual: extent.len(),
            });
        }

        let mut offset = vec![0; rank];
        offset[0] = extent[0];
        extent[0] += element_shape[0];
        container.extend_array(handle, &extent)?;
        container.write_hyperslab(handle, &offset, element_shape, vec![bytes])?;
        Ok(extent[0])
    }

    /// Read the record at `index` along axis 0
    pub(crate) fn read<R: Record>(
        &mut self,
        container: &Container,
        path: &str,
        element_shape: &[u64],
        index: u64,
    ) -> Result<R, DatasetError> {
        let path = normalize_path(path);
        let handle = self
            .lookup::<R>(container, &path)?
            .ok_or_else(|| DatasetError::NotFound(path.clone()))?;

        let extent = container.extent(handle)?;
        if extent.len() != element_shape.len() {
            return Err(DatasetError::RankMismatch {
                path,
                expected: element_shape.len(),
                actual: extent.len(),
            });
        }
        if index >= extent[0] {
            return Err(DatasetError::IndexOutOfRange {
                path,
                index,
                length: extent[0],
            });
        }

        let mut offset = vec![0; element_shape.len()];
        offset[0] = index;
        let elements = container.read_hyperslab(handle, &offset, element_shape)?;
        let bytes = elements
            .first()
            .ok_or_else(|| DatasetError::CorruptRecord(format!("{}[{}] is empty", path, index)))?;
        Ok(R::decode(bytes)?)
    }

    /// Length along axis 0 of the table at `path`
    pub(crate) fn length<R: Record>(
        &mut self,
        container: &Container,
        path: &str,
    ) -> Result<u64, DatasetError> {
        let path = normalize_path(path);
        let handle = self
            .lookup::<R>(container, &path)?
            .ok_or_else(|| DatasetError::NotFound(path.clone()))?;
        let extent = container.extent(handle)?;
        extent
            .first()
            .copied()
            .ok_or_else(|| DatasetError::RankMismatch {
                path,
                expected: 1,
                actual: 0,
            })
    }
}

fn check_type<R: Record>(
    container: &Container,
    path: &str,
    handle: ArrayHandle,
) -> Result<(), DatasetError> {
    let actual = container.type_of(handle)?;
    let expected = R::type_descriptor();
    if actual != expected {
        return Err(DatasetError::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}
