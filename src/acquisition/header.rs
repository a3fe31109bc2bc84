use serde::{Deserialize, Serialize};

use crate::schema::{
    CHANNEL_MASKS, DIRECTION_LENGTH, PHYS_STAMPS, POSITION_LENGTH, USER_FLOATS, USER_INTS,
};

/// Encoding loop counters for one acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodingCounters {
    /// Phase encoding line number
    pub kspace_encode_step_1: u16,
    /// Partition encoding number
    pub kspace_encode_step_2: u16,
    /// Signal average number
    pub average: u16,
    /// Imaging slice number
    pub slice: u16,
    /// Echo number in multi-echo
    pub contrast: u16,
    /// Cardiac phase number
    pub phase: u16,
    /// Dynamic number for dynamic scanning
    pub repetition: u16,
    /// Flow encoding set
    pub set: u16,
    /// Segment number for segmented acquisition
    pub segment: u16,
    /// Free user counters
    pub user: [u16; USER_INTS],
}

/// Fixed-size header of one acquisition.
///
/// All array lengths are fixed by the format version, so the header never
/// varies in size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionHeader {
    /// First unsigned int indicates the version
    pub version: u16,
    /// Numeric type of each sample
    pub storage_type: u16,
    /// Stream this acquisition belongs to
    pub stream_number: u16,
    /// Bit field with flags
    pub flags: u64,
    /// Unique ID for the measurement
    pub measurement_uid: u32,
    /// Current acquisition number in the measurement
    pub scan_counter: u32,
    /// Acquisition clock
    pub acquisition_time_stamp: u32,
    /// Physiology time stamps, e.g. ecg, breathing
    pub physiology_time_stamp: [u32; PHYS_STAMPS],
    /// Number of samples acquired
    pub number_of_samples: u16,
    /// Available coils
    pub available_channels: u16,
    /// Active coils on current acquisition
    pub active_channels: u16,
    /// Mask to indicate which channels are active
    pub channel_mask: [u64; CHANNEL_MASKS],
    /// Samples to be discarded at the beginning of the acquisition
    pub discard_pre: u16,
    /// Samples to be discarded at the end of the acquisition
    pub discard_post: u16,
    /// Sample at the center of k-space
    pub center_sample: u16,
    /// Reference to an encoding space, typically only one per acquisition
    pub encoding_space_ref: u16,
    /// Number of dimensions in the trajectory vector
    pub trajectory_dimensions: u16,
    /// Time between samples in microseconds
    pub sample_time_us: f32,
    /// Three-dimensional spatial offsets from isocenter
    pub position: [f32; POSITION_LENGTH],
    /// Directional cosines of the readout/frequency encoding
    pub read_dir: [f32; DIRECTION_LENGTH],
    /// Directional cosines of the phase encoding
    pub phase_dir: [f32; DIRECTION_LENGTH],
    /// Directional cosines of the slice direction
    pub slice_dir: [f32; DIRECTION_LENGTH],
    /// Patient table off-center
    pub patient_table_position: [f32; POSITION_LENGTH],
    /// Encoding loop counters
    pub idx: EncodingCounters,
    /// Free user parameters
    pub user_int: [i32; USER_INTS],
    /// Free user parameters
    pub user_float: [f32; USER_FLOATS],
}

impl Default for AcquisitionHeader {
    fn default() -> Self {
        Self {
            version: 1,
            storage_type: 0,
            stream_number: 0,
            flags: 0,
            measurement_uid: 0,
            scan_counter: 0,
            acquisition_time_stamp: 0,
            physiology_time_stamp: [0; PHYS_STAMPS],
            number_of_samples: 0,
            available_channels: 1,
            active_channels: 1,
            channel_mask: [0; CHANNEL_MASKS],
            discard_pre: 0,
            discard_post: 0,
            center_sample: 0,
            encoding_space_ref: 0,
            trajectory_dimensions: 0,
            sample_time_us: 0.0,
            position: [0.0; POSITION_LENGTH],
            read_dir: [0.0; DIRECTION_LENGTH],
            phase_dir: [0.0; DIRECTION_LENGTH],
            slice_dir: [0.0; DIRECTION_LENGTH],
            patient_table_position: [0.0; POSITION_LENGTH],
            idx: EncodingCounters::default(),
            user_int: [0; USER_INTS],
            user_float: [0.0; USER_FLOATS],
        }
    }
}

impl AcquisitionHeader {
    /// Test whether flag bit `flag` (1-based) is set
    pub fn is_flag_set(&self, flag: u8) -> bool {
        (1..=64).contains(&flag) && self.flags & (1u64 << (flag - 1)) != 0
    }

    /// Set flag bit `flag` (1-based); out-of-range bits are ignored
    pub fn set_flag(&mut self, flag: u8) {
        if (1..=64).contains(&flag) {
            self.flags |= 1u64 << (flag - 1);
        }
    }

    /// Clear flag bit `flag` (1-based)
    pub fn clear_flag(&mut self, flag: u8) {
        if (1..=64).contains(&flag) {
            self.flags &= !(1u64 << (flag - 1));
        }
    }

    /// Number of complex samples the payload must carry
    pub fn complex_sample_count(&self) -> usize {
        self.active_channels as usize * self.number_of_samples as usize
    }

    /// Number of trajectory floats the payload must carry
    pub fn trajectory_len(&self) -> usize {
        self.trajectory_dimensions as usize * self.number_of_samples as usize
    }
}
