use serde::{Deserialize, Serialize};

use crate::container::{normalize_path, AccessMode};
use crate::schema::DEFAULT_GROUP_NAME;

/// Options for opening a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Base group under which all dataset content lives
    pub group_name: String,

    /// Create an empty container when the file does not exist
    pub create_if_missing: bool,

    /// Open without write access
    pub read_only: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
            create_if_missing: true,
            read_only: false,
        }
    }
}

impl DatasetConfig {
    /// Configuration for inspecting an existing dataset without modifying it
    pub fn read_only() -> Self {
        Self {
            create_if_missing: false,
            read_only: true,
            ..Self::default()
        }
    }

    /// Set the base group
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// Allow or forbid creating a missing file
    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Request read-only access
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub(crate) fn access_mode(&self) -> AccessMode {
        if self.read_only {
            AccessMode::ReadOnly
        } else {
            AccessMode::ReadWrite
        }
    }

    pub(crate) fn base_path(&self) -> String {
        normalize_path(&self.group_name)
    }
}
