//! ZIP persistence for containers.
//!
//! ```text
//! {name}.mrd (ZIP archive)
//! ├── mimetype          # "application/vnd.mrdset" (uncompressed, first entry)
//! ├── manifest.json     # groups, arrays, type descriptors, extents
//! └── arrays/{n}.bin    # element blobs of array n (uncompressed)
//! ```
//!
//! An array blob is the sequence of its elements in row-major order, each
//! written as a little-endian `u32` byte length followed by the bytes.
//! Elements that were never written are stored with length `u32::MAX`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::schema::{TypeDescriptor, MRDSET_FORMAT_VERSION, MRDSET_MIMETYPE};

use super::error::ContainerError;
use super::node::{ArrayData, ArrayHandle, Node};

const MANIFEST_ENTRY: &str = "manifest.json";
const UNWRITTEN: u32 = u32::MAX;

/// Container-level provenance carried in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Format version the container was written with
    pub format_version: String,
    /// Unique identifier assigned at creation
    pub container_id: Uuid,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Time of the last flush
    pub modified: DateTime<Utc>,
}

impl ContainerInfo {
    pub(super) fn new() -> Self {
        let now = Utc::now();
        Self {
            format_version: MRDSET_FORMAT_VERSION.to_string(),
            container_id: Uuid::new_v4(),
            created: now,
            modified: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    #[serde(flatten)]
    info: ContainerInfo,
    groups: Vec<String>,
    arrays: Vec<ArrayEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArrayEntry {
    path: String,
    dtype: TypeDescriptor,
    extent: Vec<u64>,
    max_extent: Vec<Option<u64>>,
    chunk: Vec<u64>,
    blob: String,
}

/// Everything a container holds in memory
pub(super) struct ContainerState {
    pub(super) info: ContainerInfo,
    pub(super) nodes: BTreeMap<String, Node>,
    pub(super) arrays: Vec<ArrayData>,
}

impl ContainerState {
    pub(super) fn empty() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Group);
        Self {
            info: ContainerInfo::new(),
            nodes,
            arrays: Vec::new(),
        }
    }
}

/// Check whether `path` is a ZIP archive whose first entry is the mrdset mimetype
pub fn is_recognized_format<P: AsRef<Path>>(path: P) -> bool {
    let Ok(file) = File::open(path.as_ref()) else {
        return false;
    };
    let Ok(mut archive) = ZipArchive::new(BufReader::new(file)) else {
        return false;
    };
    if archive.len() == 0 {
        return false;
    }
    let Ok(mut first) = archive.by_index(0) else {
        return false;
    };
    if first.name() != "mimetype" {
        return false;
    }
    let mut content = String::new();
    first.read_to_string(&mut content).is_ok() && content == MRDSET_MIMETYPE
}

/// Load the full container state from disk
pub(super) fn load(path: &Path) -> Result<ContainerState, ContainerError> {
    if !is_recognized_format(path) {
        return Err(ContainerError::NotAContainer(path.display().to_string()));
    }

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let manifest: Manifest = {
        let entry = archive.by_name(MANIFEST_ENTRY).map_err(|_| {
            ContainerError::Malformed(format!("container missing {}", MANIFEST_ENTRY))
        })?;
        serde_json::from_reader(entry)?
    };

    let mut nodes = BTreeMap::new();
    nodes.insert("/".to_string(), Node::Group);
    for group in manifest.groups {
        nodes.insert(group, Node::Group);
    }

    let mut arrays = Vec::with_capacity(manifest.arrays.len());
    for entry in manifest.arrays {
        if entry.extent.len() != entry.max_extent.len() || entry.extent.len() != entry.chunk.len() {
            return Err(ContainerError::Malformed(format!(
                "rank disagreement in array metadata for {}",
                entry.path
            )));
        }
        super::check_within_max(&entry.extent, &entry.max_extent).map_err(|e| {
            ContainerError::Malformed(format!("array metadata for {}: {}", entry.path, e))
        })?;
        let expected = ArrayData::element_count(&entry.extent).ok_or_else(|| {
            ContainerError::Malformed(format!(
                "extent {:?} of {} overflows the element count",
                entry.extent, entry.path
            ))
        })?;
        let elements = {
            let blob = archive.by_name(&entry.blob).map_err(|_| {
                ContainerError::Malformed(format!("container missing {}", entry.blob))
            })?;
            read_blob(blob, expected, &entry.path)?
        };

        let handle = ArrayHandle(arrays.len());
        nodes.insert(entry.path.clone(), Node::Array(handle));
        arrays.push(ArrayData {
            path: entry.path,
            dtype: entry.dtype,
            extent: entry.extent,
            max_extent: entry.max_extent,
            chunk: entry.chunk,
            elements,
        });
    }

    Ok(ContainerState {
        info: manifest.info,
        nodes,
        arrays,
    })
}

/// Write the full container state, replacing `path` atomically
pub(super) fn save(path: &Path, state: &ContainerState) -> Result<(), ContainerError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir)?;

    {
        let mut zip_writer = ZipWriter::new(BufWriter::new(tmp.as_file()));

        // Write mimetype as first entry (MUST be uncompressed and first)
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        zip_writer.start_file("mimetype", stored)?;
        zip_writer.write_all(MRDSET_MIMETYPE.as_bytes())?;

        let manifest = Manifest {
            info: state.info.clone(),
            groups: state
                .nodes
                .iter()
                .filter(|(p, n)| matches!(n, Node::Group) && p.as_str() != "/")
                .map(|(p, _)| p.clone())
                .collect(),
            arrays: state
                .arrays
                .iter()
                .enumerate()
                .map(|(n, a)| ArrayEntry {
                    path: a.path.clone(),
                    dtype: a.dtype.clone(),
                    extent: a.extent.clone(),
                    max_extent: a.max_extent.clone(),
                    chunk: a.chunk.clone(),
                    blob: format!("arrays/{}.bin", n),
                })
                .collect(),
        };

        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);
        zip_writer.start_file(MANIFEST_ENTRY, deflated)?;
        serde_json::to_writer_pretty(&mut zip_writer, &manifest)?;

        for (n, array) in state.arrays.iter().enumerate() {
            zip_writer.start_file(format!("arrays/{}.bin", n), stored)?;
            write_blob(&mut zip_writer, &array.elements)?;
        }

        let mut inner = zip_writer.finish()?;
        inner.flush()?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ContainerError::IoError(e.error))?;
    Ok(())
}

fn write_blob<W: Write>(out: &mut W, elements: &[Option<Vec<u8>>]) -> Result<(), ContainerError> {
    for element in elements {
        match element {
            Some(bytes) => {
                let len = u32::try_from(bytes.len()).map_err(|_| {
                    ContainerError::Malformed(format!("element of {} bytes too large", bytes.len()))
                })?;
                out.write_u32::<LittleEndian>(len)?;
                out.write_all(bytes)?;
            }
            None => out.write_u32::<LittleEndian>(UNWRITTEN)?,
        }
    }
    Ok(())
}

fn read_blob<R: Read>(
    mut input: R,
    expected: u64,
    path: &str,
) -> Result<Vec<Option<Vec<u8>>>, ContainerError> {
    // `expected` comes from the manifest, so storage grows with what is actually read
    let mut elements = Vec::new();
    for n in 0..expected {
        let len = input.read_u32::<LittleEndian>().map_err(|_| {
            ContainerError::Malformed(format!("array {} holds fewer than {} elements", path, expected))
        })?;
        if len == UNWRITTEN {
            elements.push(None);
            continue;
        }
        let mut bytes = Vec::new();
        (&mut input).take(u64::from(len)).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != u64::from(len) {
            return Err(ContainerError::Malformed(format!(
                "array {} element {} truncated: {} of {} bytes",
                path,
                n,
                bytes.len(),
                len
            )));
        }
        elements.push(Some(bytes));
    }

    let mut trailing = [0u8; 1];
    if input.read(&mut trailing)? != 0 {
        return Err(ContainerError::Malformed(format!(
            "array {} holds more than {} elements",
            path, expected
        )));
    }
    Ok(elements)
}
