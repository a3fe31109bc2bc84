//! # On-disk Records
//!
//! Typed values that are stored as array elements in a container, together
//! with their byte encoding. Each [`Record`] names the registered
//! [`TypeDescriptor`] it encodes to, so the table engine can declare and
//! verify element types without knowing the concrete record.
//!
//! All values are little-endian. The fixed part of a record follows the
//! packed offsets of its layout; variable-length payloads follow the fixed
//! part in a per-record heap.

mod codec;
mod error;


pub use error::RecordError;

use codec::{RecordReader, RecordWriter};

use crate::acquisition::{AcquisitionHeader, EncodingCounters};
use crate::schema::{
    acquisition_record_layout, index_entry_layout, xml_header_layout, TypeDescriptor,
};

/// A value that can be stored as one element of a typed array
pub trait Record: Sized {
    /// Registered layout of this record kind
    fn type_descriptor() -> &'static TypeDescriptor;

    /// Encode into the on-disk byte representation
    fn encode(&self) -> Vec<u8>;

    /// Decode from the on-disk byte representation
    fn decode(bytes: &[u8]) -> Result<Self, RecordError>;
}

/// Entry of the global index: where the n-th appended acquisition lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexEntry {
    /// Stream number
    pub stream: u32,
    /// Offset within the stream's array
    pub index: u32,
}

impl Record for IndexEntry {
    fn type_descriptor() -> &'static TypeDescriptor {
        index_entry_layout()
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::new(Self::type_descriptor().size());
        w.put_u32(self.stream);
        w.put_u32(self.index);
        w.finish()
    }

    fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut r = RecordReader::new(bytes, Self::type_descriptor().size())?;
        Ok(Self {
            stream: r.get_u32()?,
            index: r.get_u32()?,
        })
    }
}

/// Stored form of an acquisition: header plus flat float payloads.
///
/// `data` holds interleaved real/imaginary components.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionRecord {
    /// Acquisition header
    pub head: AcquisitionHeader,
    /// Trajectory values
    pub traj: Vec<f32>,
    /// Interleaved complex samples
    pub data: Vec<f32>,
}

impl Record for AcquisitionRecord {
    fn type_descriptor() -> &'static TypeDescriptor {
        acquisition_record_layout()
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::new(Self::type_descriptor().size());
        write_header(&mut w, &self.head);
        w.put_var_f32(&self.traj);
        w.put_var_f32(&self.data);
        w.finish()
    }

    fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut r = RecordReader::new(bytes, Self::type_descriptor().size())?;
        let head = read_header(&mut r)?;
        let traj = r.get_var_f32("traj")?;
        let data = r.get_var_f32("data")?;
        Ok(Self { head, traj, data })
    }
}

/// The serialized header document stored at `<base>/xml`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderDocument(pub String);

impl Record for HeaderDocument {
    fn type_descriptor() -> &'static TypeDescriptor {
        xml_header_layout()
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = RecordWriter::new(Self::type_descriptor().size());
        w.put_var_str(&self.0);
        w.finish()
    }

    fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut r = RecordReader::new(bytes, Self::type_descriptor().size())?;
        Ok(Self(r.get_var_str("xml")?))
    }
}

fn write_counters(w: &mut RecordWriter, idx: &EncodingCounters) {
    w.put_u16(idx.kspace_encode_step_1);
    w.put_u16(idx.kspace_encode_step_2);
    w.put_u16(idx.average);
    w.put_u16(idx.slice);
    w.put_u16(idx.contrast);
    w.put_u16(idx.phase);
    w.put_u16(idx.repetition);
    w.put_u16(idx.set);
    w.put_u16(idx.segment);
    w.put_u16_array(&idx.user);
}

fn read_counters(r: &mut RecordReader<'_>) -> Result<EncodingCounters, RecordError> {
    Ok(EncodingCounters {
        kspace_encode_step_1: r.get_u16()?,
        kspace_encode_step_2: r.get_u16()?,
        average: r.get_u16()?,
        slice: r.get_u16()?,
        contrast: r.get_u16()?,
        phase: r.get_u16()?,
        repetition: r.get_u16()?,
        set: r.get_u16()?,
        segment: r.get_u16()?,
        user: r.get_u16_array()?,
    })
}

fn write_header(w: &mut RecordWriter, h: &AcquisitionHeader) {
    w.put_u16(h.version);
    w.put_u16(h.storage_type);
    w.put_u16(h.stream_number);
    w.put_u64(h.flags);
    w.put_u32(h.measurement_uid);
    w.put_u32(h.scan_counter);
    w.put_u32(h.acquisition_time_stamp);
    w.put_u32_array(&h.physiology_time_stamp);
    w.put_u16(h.number_of_samples);
    w.put_u16(h.available_channels);
    w.put_u16(h.active_channels);
    w.put_u64_array(&h.channel_mask);
    w.put_u16(h.discard_pre);
    w.put_u16(h.discard_post);
    w.put_u16(h.center_sample);
    w.put_u16(h.encoding_space_ref);
    w.put_u16(h.trajectory_dimensions);
    w.put_f32(h.sample_time_us);
    w.put_f32_array(&h.position);
    w.put_f32_array(&h.read_dir);
    w.put_f32_array(&h.phase_dir);
    w.put_f32_array(&h.slice_dir);
    w.put_f32_array(&h.patient_table_position);
    write_counters(w, &h.idx);
    w.put_i32_array(&h.user_int);
    w.put_f32_array(&h.user_float);
}

fn read_header(r: &mut RecordReader<'_>) -> Result<AcquisitionHeader, RecordError> {
    Ok(AcquisitionHeader {
        version: r.get_u16()?,
        storage_type: r.get_u16()?,
        stream_number: r.get_u16()?,
        flags: r.get_u64()?,
        measurement_uid: r.get_u32()?,
        scan_counter: r.get_u32()?,
        acquisition_time_stamp: r.get_u32()?,
        physiology_time_stamp: r.get_u32_array()?,
        number_of_samples: r.get_u16()?,
        available_channels: r.get_u16()?,
        active_channels: r.get_u16()?,
        channel_mask: r.get_u64_array()?,
        discard_pre: r.get_u16()?,
        discard_post: r.get_u16()?,
        center_sample: r.get_u16()?,
        encoding_space_ref: r.get_u16()?,
        trajectory_dimensions: r.get_u16()?,
        sample_time_us: r.get_f32()?,
        position: r.get_f32_array()?,
        read_dir: r.get_f32_array()?,
        phase_dir: r.get_f32_array()?,
        slice_dir: r.get_f32_array()?,
        patient_table_position: r.get_f32_array()?,
        idx: read_counters(r)?,
        user_int: r.get_i32_array()?,
        user_float: r.get_f32_array()?,
    })
}

// Sizes written by the encoders above must track the registered layouts.
#[cfg(test)]
pub(crate) fn encoded_fixed_sizes() -> [(usize, usize); 2] {
    use crate::schema::{acquisition_header_layout, encoding_counters_layout};

    let mut w = RecordWriter::new(acquisition_header_layout().size());
    write_header(&mut w, &AcquisitionHeader::default());
    let header = w.finish().len();
    let mut w = RecordWriter::new(encoding_counters_layout().size());
    write_counters(&mut w, &EncodingCounters::default());
    let counters = w.finish().len();
    [
        (header, acquisition_header_layout().size()),
        (counters, encoding_counters_layout().size()),
    ]
}
