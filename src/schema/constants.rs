/// Container format version - follows semantic versioning
pub const MRDSET_FORMAT_VERSION: &str = "1.0.0";

/// File extension for mrdset containers
pub const MRDSET_EXTENSION: &str = ".mrd";

/// MIME type stored as the first entry of every container (public for use in validator and container modules)
pub const MRDSET_MIMETYPE: &str = "application/vnd.mrdset";

/// Default base group under which all data lives
pub const DEFAULT_GROUP_NAME: &str = "/dataset";

/// Name of the XML header scalar below the base group
pub const XML_HEADER_NAME: &str = "xml";

/// Name of the data group below the base group
pub const DATA_GROUP_NAME: &str = "data";

/// Name of the global index table inside the data group
pub const INDEX_TABLE_NAME: &str = "index";

/// Number of physiological time stamps in an acquisition header
pub const PHYS_STAMPS: usize = 3;

/// Number of 64-bit channel mask words in an acquisition header
pub const CHANNEL_MASKS: usize = 16;

/// Number of user integers (and user encoding counters)
pub const USER_INTS: usize = 8;

/// Number of user floats
pub const USER_FLOATS: usize = 8;

/// Length of the position and table position vectors
pub const POSITION_LENGTH: usize = 3;

/// Length of the read/phase/slice direction vectors
pub const DIRECTION_LENGTH: usize = 3;

/// Element shape of every extensible table: one element along the growth axis, rank 2
pub const TABLE_ELEMENT_SHAPE: [u64; 2] = [1, 1];
