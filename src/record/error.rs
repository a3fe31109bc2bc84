/// Errors that can occur while decoding a stored record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The element is shorter than its fixed layout
    #[error("record truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// A variable-length slot points outside the record heap
    #[error("{field}: {count} values at heap offset {offset} exceed heap of {heap_len} bytes")]
    HeapOutOfBounds {
        /// Field holding the slot
        field: &'static str,
        /// Stored heap offset
        offset: u64,
        /// Stored element count
        count: u64,
        /// Actual heap length
        heap_len: usize,
    },

    /// A string payload is not valid UTF-8
    #[error("{0}: invalid UTF-8 in string payload")]
    InvalidUtf8(&'static str),
}
