use log::debug;

use crate::acquisition::{Acquisition, Complex32};
use crate::record::{AcquisitionRecord, IndexEntry};
use crate::schema::TABLE_ELEMENT_SHAPE;

use super::{Dataset, DatasetError};

impl Dataset {
    /// Append an acquisition to its stream and to the global index.
    ///
    /// The stream is `stream_override` when given, otherwise the header's
    /// `stream_number`. The header is stored unchanged either way.
    pub fn append_acquisition(
        &mut self,
        acq: &Acquisition,
        stream_override: Option<u16>,
    ) -> Result<(), DatasetError> {
        let stream = u32::from(stream_override.unwrap_or_else(|| acq.stream_number()));
        let path = self.stream_path(stream);
        let record = marshal(acq);

        let length = self
            .tables
            .append(&mut self.container, &path, &TABLE_ELEMENT_SHAPE, &record)?;
        let position = length - 1;
        let index = u32::try_from(position).map_err(|_| DatasetError::IndexOutOfRange {
            path: path.clone(),
            index: position,
            length: u64::from(u32::MAX),
        })?;

        let entry = IndexEntry { stream, index };
        self.tables
            .append(&mut self.container, &self.index_path, &TABLE_ELEMENT_SHAPE, &entry)?;
        debug!("Appended acquisition to {} at {}", path, index);
        Ok(())
    }

    /// Read an acquisition.
    ///
    /// Without `stream_override`, `index` is the global append position and
    /// is resolved through the index. With it, `index` is the offset within
    /// that stream.
    pub fn read_acquisition(
        &mut self,
        index: u64,
        stream_override: Option<u16>,
    ) -> Result<Acquisition, DatasetError> {
        let (stream, offset) = match stream_override {
            Some(stream) => (u32::from(stream), index),
            None => {
                let entry: IndexEntry =
                    self.tables
                        .read(&self.container, &self.index_path, &TABLE_ELEMENT_SHAPE, index)?;
                (entry.stream, u64::from(entry.index))
            }
        };

        let path = self.stream_path(stream);
        let record: AcquisitionRecord =
            self.tables
                .read(&self.container, &path, &TABLE_ELEMENT_SHAPE, offset)?;
        unmarshal(record).map_err(|e| match e {
            DatasetError::CorruptRecord(msg) => {
                DatasetError::CorruptRecord(format!("{}[{}]: {}", path, offset, msg))
            }
            other => other,
        })
    }

    /// Number of acquisitions in the index, or in one stream
    pub fn number_of_acquisitions(&mut self, stream_override: Option<u16>) -> Result<u64, DatasetError> {
        match stream_override {
            None => self
                .tables
                .length::<IndexEntry>(&self.container, &self.index_path),
            Some(stream) => {
                let path = self.stream_path(u32::from(stream));
                self.tables.length::<AcquisitionRecord>(&self.container, &path)
            }
        }
    }

    /// Stream numbers that have at least one stored acquisition, ascending
    pub fn streams(&self) -> Result<Vec<u16>, DatasetError> {
        if !self.exists(&self.data_path) {
            return Ok(Vec::new());
        }
        let mut streams: Vec<u16> = self
            .container
            .children(&self.data_path)?
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        streams.sort_unstable();
        Ok(streams)
    }
}

/// Flatten an acquisition into its stored form, interleaving re/im
pub(super) fn marshal(acq: &Acquisition) -> AcquisitionRecord {
    AcquisitionRecord {
        head: acq.head().clone(),
        traj: acq.traj().to_vec(),
        data: acq.data().iter().flat_map(|c| [c.re, c.im]).collect(),
    }
}

/// Rebuild an acquisition, rejecting payloads that disagree with the header
fn unmarshal(record: AcquisitionRecord) -> Result<Acquisition, DatasetError> {
    let AcquisitionRecord { head, traj, data } = record;

    let expected = 2 * head.complex_sample_count();
    if data.len() != expected {
        return Err(DatasetError::CorruptRecord(format!(
            "header declares {} data values, record holds {}",
            expected,
            data.len()
        )));
    }
    if traj.len() != head.trajectory_len() {
        return Err(DatasetError::CorruptRecord(format!(
            "header declares {} trajectory values, record holds {}",
            head.trajectory_len(),
            traj.len()
        )));
    }

    let data = data
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect();
    Ok(Acquisition::from_parts(head, traj, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquisitionBuilder;

    #[test]
    fn test_marshal_interleaves_channel_major() {
        let mut acq = AcquisitionBuilder::new(2, 2).build();
        acq.set_sample(0, 0, Complex32::new(1.0, 2.0));
        acq.set_sample(0, 1, Complex32::new(3.0, 4.0));
        acq.set_sample(1, 0, Complex32::new(5.0, 6.0));
        acq.set_sample(1, 1, Complex32::new(7.0, 8.0));

        let record = marshal(&acq);
        assert_eq!(record.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(unmarshal(record).unwrap(), acq);
    }

    #[test]
    fn test_unmarshal_rejects_short_data() {
        let acq = AcquisitionBuilder::new(4, 1).trajectory_dimensions(2).build();
        let mut record = marshal(&acq);
        record.data.pop();
        assert!(matches!(unmarshal(record), Err(DatasetError::CorruptRecord(_))));
    }

    #[test]
    fn test_unmarshal_rejects_long_traj() {
        let acq = AcquisitionBuilder::new(4, 1).trajectory_dimensions(2).build();
        let mut record = marshal(&acq);
        record.traj.push(0.5);
        assert!(matches!(unmarshal(record), Err(DatasetError::CorruptRecord(_))));
    }
}
