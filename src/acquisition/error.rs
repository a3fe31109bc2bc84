/// Errors raised when an acquisition payload disagrees with its header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    /// A payload array does not have the length the header declares
    #[error("{field} length {actual} does not match header (expected {expected})")]
    PayloadLength {
        /// Name of the payload array (`traj` or `data`)
        field: &'static str,
        /// Length implied by the header
        expected: usize,
        /// Length supplied
        actual: usize,
    },
}
