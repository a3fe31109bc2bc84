use crate::acquisition::AcquisitionError;
use crate::container::ContainerError;
use crate::record::RecordError;

/// Errors that can occur during dataset operations
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A required path (file, group, or array) does not exist
    #[error("Path not found: {0}")]
    NotFound(String),

    /// The file exists but is not a recognized container
    #[error("Not an mrdset container: {0}")]
    NotAContainer(String),

    /// An existing array carries a different element type than requested
    #[error("Type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Array path
        path: String,
        /// Requested element type
        expected: String,
        /// Element type stored in the container
        actual: String,
    },

    /// An existing array has a different rank than requested
    #[error("Rank mismatch at {path}: expected {expected}, found {actual}")]
    RankMismatch {
        /// Array path
        path: String,
        /// Requested rank
        expected: usize,
        /// Rank stored in the container
        actual: usize,
    },

    /// Element index beyond the current length of an array
    #[error("Index {index} out of range for {path} (length {length})")]
    IndexOutOfRange {
        /// Array path
        path: String,
        /// Requested index
        index: u64,
        /// Current length along the first axis
        length: u64,
    },

    /// Stored payload lengths disagree with the stored header, or a record
    /// could not be decoded
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// A path exists with the wrong kind (group vs. array)
    #[error("Path conflict: {0}")]
    PathConflict(String),

    /// Write attempted on a dataset opened read-only
    #[error("Dataset is read-only")]
    ReadOnly,

    /// Any other failure reported by the container engine
    #[error("Container error: {0}")]
    Container(#[source] ContainerError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ContainerError> for DatasetError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::NotFound(path) => Self::NotFound(path),
            ContainerError::NotAContainer(path) => Self::NotAContainer(path),
            ContainerError::PathConflict(path) => Self::PathConflict(path),
            ContainerError::ReadOnly => Self::ReadOnly,
            ContainerError::IoError(e) => Self::IoError(e),
            other => Self::Container(other),
        }
    }
}

impl From<RecordError> for DatasetError {
    fn from(err: RecordError) -> Self {
        Self::CorruptRecord(err.to_string())
    }
}

impl From<AcquisitionError> for DatasetError {
    fn from(err: AcquisitionError) -> Self {
        Self::CorruptRecord(err.to_string())
    }
}
