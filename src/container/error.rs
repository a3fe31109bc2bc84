/// Errors raised by the hierarchical container engine
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the ZIP container library
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Error serializing/deserializing the manifest
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File exists but is not an mrdset container
    #[error("Not an mrdset container: {0}")]
    NotAContainer(String),

    /// No link at the given path
    #[error("Path not found: {0}")]
    NotFound(String),

    /// A link already exists at the given path
    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    /// A link exists but is of the wrong kind (group vs. array)
    #[error("Path conflict: {0}")]
    PathConflict(String),

    /// Path is empty or refers to the root where a child is required
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Mutation attempted on a container opened read-only
    #[error("Container is read-only")]
    ReadOnly,

    /// Array handle does not belong to this container
    #[error("Invalid array handle")]
    InvalidHandle,

    /// Requested extent is malformed or exceeds the maximum extent
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    /// Hyperslab selection falls outside the current extent
    #[error("Hyperslab out of bounds: {0}")]
    OutOfBounds(String),

    /// Element bytes do not match the array's element type
    #[error("Element size mismatch: expected {expected} bytes, got {actual}")]
    ElementSize {
        /// Fixed element size of the array type
        expected: usize,
        /// Size of the rejected element
        actual: usize,
    },

    /// Manifest or array blob content is inconsistent
    #[error("Malformed container: {0}")]
    Malformed(String),
}
