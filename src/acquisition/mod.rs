//! # In-memory Acquisitions
//!
//! An [`Acquisition`] is one measurement readout: a fixed-size
//! [`AcquisitionHeader`], a trajectory of `trajectory_dimensions` floats per
//! sample, and `active_channels * number_of_samples` complex samples.
//!
//! The payload lengths always follow the header. Changing the sample count,
//! channel count or trajectory dimensionality goes through
//! [`Acquisition::resize`] (or [`Acquisition::set_head`]), which reallocates
//! the payload arrays and zero-fills them.
//!
//! ## Payload Layout
//!
//! - `traj[sample * trajectory_dimensions + dim]`
//! - `data[channel * number_of_samples + sample]`
//!
//! ## Example
//!
//! ```rust
//! use mrdset::acquisition::{AcquisitionBuilder, Complex32};
//!
//! let mut acq = AcquisitionBuilder::new(128, 4)
//!     .trajectory_dimensions(2)
//!     .stream_number(1)
//!     .scan_counter(7)
//!     .build();
//!
//! acq.set_sample(2, 10, Complex32::new(1.0, -1.0));
//! assert_eq!(acq.data().len(), 4 * 128);
//! assert_eq!(acq.traj().len(), 2 * 128);
//! ```

mod error;
mod header;

#[cfg(test)]
mod tests;

pub use error::AcquisitionError;
pub use header::{AcquisitionHeader, EncodingCounters};

/// Single-precision complex sample
pub use num_complex::Complex32;

/// One acquisition: header, trajectory and complex samples
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    head: AcquisitionHeader,
    traj: Vec<f32>,
    data: Vec<Complex32>,
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::new(0, 1, 0)
    }
}

impl Acquisition {
    /// Create a zero-filled acquisition with the given dimensions
    pub fn new(number_of_samples: u16, active_channels: u16, trajectory_dimensions: u16) -> Self {
        let mut acq = Self {
            head: AcquisitionHeader::default(),
            traj: Vec::new(),
            data: Vec::new(),
        };
        acq.resize(number_of_samples, active_channels, trajectory_dimensions);
        acq
    }

    /// Assemble an acquisition from a header and existing payloads.
    ///
    /// Fails if either payload length disagrees with the header.
    pub fn from_parts(
        head: AcquisitionHeader,
        traj: Vec<f32>,
        data: Vec<Complex32>,
    ) -> Result<Self, AcquisitionError> {
        if traj.len() != head.trajectory_len() {
            return Err(AcquisitionError::PayloadLength {
                field: "traj",
                expected: head.trajectory_len(),
                actual: traj.len(),
            });
        }
        if data.len() != head.complex_sample_count() {
            return Err(AcquisitionError::PayloadLength {
                field: "data",
                expected: head.complex_sample_count(),
                actual: data.len(),
            });
        }
        Ok(Self { head, traj, data })
    }

    /// Split the acquisition into header and payloads
    pub fn into_parts(self) -> (AcquisitionHeader, Vec<f32>, Vec<Complex32>) {
        (self.head, self.traj, self.data)
    }

    /// Header of this acquisition
    pub fn head(&self) -> &AcquisitionHeader {
        &self.head
    }

    /// Replace the header, resizing the payloads to match it
    pub fn set_head(&mut self, head: AcquisitionHeader) {
        let (samples, channels, dims) = (
            head.number_of_samples,
            head.active_channels,
            head.trajectory_dimensions,
        );
        self.head = head;
        self.resize(samples, channels, dims);
    }

    /// Change the payload dimensions; payloads are reallocated and zeroed
    pub fn resize(&mut self, number_of_samples: u16, active_channels: u16, trajectory_dimensions: u16) {
        self.head.number_of_samples = number_of_samples;
        self.head.active_channels = active_channels;
        self.head.trajectory_dimensions = trajectory_dimensions;
        self.traj = vec![0.0; self.head.trajectory_len()];
        self.data = vec![Complex32::default(); self.head.complex_sample_count()];
    }

    /// Trajectory values, `trajectory_dimensions` per sample
    pub fn traj(&self) -> &[f32] {
        &self.traj
    }

    /// Mutable trajectory values
    pub fn traj_mut(&mut self) -> &mut [f32] {
        &mut self.traj
    }

    /// Complex samples, channel-major
    pub fn data(&self) -> &[Complex32] {
        &self.data
    }

    /// Mutable complex samples
    pub fn data_mut(&mut self) -> &mut [Complex32] {
        &mut self.data
    }

    /// Stream this acquisition is appended to by default
    pub fn stream_number(&self) -> u16 {
        self.head.stream_number
    }

    /// Set the default stream
    pub fn set_stream_number(&mut self, stream_number: u16) {
        self.head.stream_number = stream_number;
    }

    /// Samples per channel
    pub fn number_of_samples(&self) -> u16 {
        self.head.number_of_samples
    }

    /// Number of active channels
    pub fn active_channels(&self) -> u16 {
        self.head.active_channels
    }

    /// Trajectory dimensionality
    pub fn trajectory_dimensions(&self) -> u16 {
        self.head.trajectory_dimensions
    }

    /// Encoding counters
    pub fn idx(&self) -> &EncodingCounters {
        &self.head.idx
    }

    /// Mutable encoding counters
    pub fn idx_mut(&mut self) -> &mut EncodingCounters {
        &mut self.head.idx
    }

    /// Complex sample at `(channel, sample)`
    pub fn sample(&self, channel: usize, sample: usize) -> Option<Complex32> {
        self.sample_offset(channel, sample).map(|i| self.data[i])
    }

    /// Set the complex sample at `(channel, sample)`; returns false when out of range
    pub fn set_sample(&mut self, channel: usize, sample: usize, value: Complex32) -> bool {
        match self.sample_offset(channel, sample) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Trajectory coordinate `dim` of `sample`
    pub fn traj_value(&self, sample: usize, dim: usize) -> Option<f32> {
        let dims = self.head.trajectory_dimensions as usize;
        if dim >= dims || sample >= self.head.number_of_samples as usize {
            return None;
        }
        self.traj.get(sample * dims + dim).copied()
    }

    fn sample_offset(&self, channel: usize, sample: usize) -> Option<usize> {
        let samples = self.head.number_of_samples as usize;
        if channel >= self.head.active_channels as usize || sample >= samples {
            return None;
        }
        Some(channel * samples + sample)
    }
}

/// Builder for acquisitions
#[derive(Debug, Clone)]
pub struct AcquisitionBuilder {
    head: AcquisitionHeader,
}

impl AcquisitionBuilder {
    /// Create a builder with the required payload dimensions
    pub fn new(number_of_samples: u16, active_channels: u16) -> Self {
        let head = AcquisitionHeader {
            number_of_samples,
            active_channels,
            available_channels: active_channels,
            ..AcquisitionHeader::default()
        };
        Self { head }
    }

    /// Set the trajectory dimensionality (0 for Cartesian data)
    pub fn trajectory_dimensions(mut self, dims: u16) -> Self {
        self.head.trajectory_dimensions = dims;
        self
    }

    /// Set the stream number embedded in the header
    pub fn stream_number(mut self, stream: u16) -> Self {
        self.head.stream_number = stream;
        self
    }

    /// Set the scan counter
    pub fn scan_counter(mut self, counter: u32) -> Self {
        self.head.scan_counter = counter;
        self
    }

    /// Set the measurement UID
    pub fn measurement_uid(mut self, uid: u32) -> Self {
        self.head.measurement_uid = uid;
        self
    }

    /// Set the acquisition time stamp
    pub fn acquisition_time_stamp(mut self, stamp: u32) -> Self {
        self.head.acquisition_time_stamp = stamp;
        self
    }

    /// Set a 1-based header flag
    pub fn flag(mut self, flag: u8) -> Self {
        self.head.set_flag(flag);
        self
    }

    /// Set the encoding counters
    pub fn idx(mut self, idx: EncodingCounters) -> Self {
        self.head.idx = idx;
        self
    }

    /// Set the sample dwell time in microseconds
    pub fn sample_time_us(mut self, dwell: f32) -> Self {
        self.head.sample_time_us = dwell;
        self
    }

    /// Build a zero-filled acquisition
    pub fn build(self) -> Acquisition {
        let mut acq = Acquisition::default();
        acq.set_head(self.head);
        acq
    }
}
