//! Record layouts registered for each on-disk record kind.
//!
//! Every layout is built once on first use and handed out by reference.

use std::sync::OnceLock;

use super::constants::{
    CHANNEL_MASKS, DIRECTION_LENGTH, PHYS_STAMPS, POSITION_LENGTH, USER_FLOATS, USER_INTS,
};
use super::descriptor::{CompoundType, PrimitiveKind, TypeDescriptor};

use PrimitiveKind::{F32, I32, U16, U32, U64};

/// Layout of one global index entry: `{stream: u32, index: u32}`
pub fn index_entry_layout() -> &'static TypeDescriptor {
    static LAYOUT: OnceLock<TypeDescriptor> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        CompoundType::builder()
            .primitive("stream", U32)
            .primitive("index", U32)
            .build()
    })
}

/// Layout of the encoding loop counters embedded in every acquisition header
pub fn encoding_counters_layout() -> &'static TypeDescriptor {
    static LAYOUT: OnceLock<TypeDescriptor> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        CompoundType::builder()
            .primitive("kspace_encode_step_1", U16)
            .primitive("kspace_encode_step_2", U16)
            .primitive("average", U16)
            .primitive("slice", U16)
            .primitive("contrast", U16)
            .primitive("phase", U16)
            .primitive("repetition", U16)
            .primitive("set", U16)
            .primitive("segment", U16)
            .array("user", U16, USER_INTS)
            .build()
    })
}

/// Layout of the fixed-size acquisition header
pub fn acquisition_header_layout() -> &'static TypeDescriptor {
    static LAYOUT: OnceLock<TypeDescriptor> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        CompoundType::builder()
            .primitive("version", U16)
            .primitive("storage_type", U16)
            .primitive("stream_number", U16)
            .primitive("flags", U64)
            .primitive("measurement_uid", U32)
            .primitive("scan_counter", U32)
            .primitive("acquisition_time_stamp", U32)
            .array("physiology_time_stamp", U32, PHYS_STAMPS)
            .primitive("number_of_samples", U16)
            .primitive("available_channels", U16)
            .primitive("active_channels", U16)
            .array("channel_mask", U64, CHANNEL_MASKS)
            .primitive("discard_pre", U16)
            .primitive("discard_post", U16)
            .primitive("center_sample", U16)
            .primitive("encoding_space_ref", U16)
            .primitive("trajectory_dimensions", U16)
            .primitive("sample_time_us", F32)
            .array("position", F32, POSITION_LENGTH)
            .array("read_dir", F32, DIRECTION_LENGTH)
            .array("phase_dir", F32, DIRECTION_LENGTH)
            .array("slice_dir", F32, DIRECTION_LENGTH)
            .array("patient_table_position", F32, POSITION_LENGTH)
            .field("idx", encoding_counters_layout().clone())
            .array("user_int", I32, USER_INTS)
            .array("user_float", F32, USER_FLOATS)
            .build()
    })
}

/// Layout of a stored acquisition: header plus trajectory and sample payloads
pub fn acquisition_record_layout() -> &'static TypeDescriptor {
    static LAYOUT: OnceLock<TypeDescriptor> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        CompoundType::builder()
            .field("head", acquisition_header_layout().clone())
            .field("traj", TypeDescriptor::var_len(F32))
            .field("data", TypeDescriptor::var_len(F32))
            .build()
    })
}

/// Layout of the XML header scalar
pub fn xml_header_layout() -> &'static TypeDescriptor {
    static LAYOUT: OnceLock<TypeDescriptor> = OnceLock::new();
    LAYOUT.get_or_init(|| TypeDescriptor::VarString)
}
