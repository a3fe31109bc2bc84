//! Property-based tests of the append/read engine

use mrdset::acquisition::{Acquisition, AcquisitionHeader, Complex32};
use mrdset::dataset::{Dataset, DatasetConfig};
use proptest::prelude::*;
use tempfile::tempdir;

/// Any f32, NaN payloads and signed zeros included
fn any_f32_bits() -> impl Strategy<Value = f32> {
    any::<u32>().prop_map(f32::from_bits)
}

fn arb_acquisition() -> impl Strategy<Value = Acquisition> {
    (0u16..12, 1u16..4, 0u16..4, any::<u16>(), any::<u32>(), any::<u64>()).prop_flat_map(
        |(samples, channels, dims, stream, scan, flags)| {
            let head = AcquisitionHeader {
                number_of_samples: samples,
                active_channels: channels,
                available_channels: channels,
                trajectory_dimensions: dims,
                stream_number: stream,
                scan_counter: scan,
                flags,
                ..AcquisitionHeader::default()
            };
            let traj = prop::collection::vec(any_f32_bits(), head.trajectory_len());
            let data = prop::collection::vec(
                (any_f32_bits(), any_f32_bits()).prop_map(|(re, im)| Complex32::new(re, im)),
                head.complex_sample_count(),
            );
            (Just(head), traj, data)
        },
    )
    .prop_map(|(head, traj, data)| {
        Acquisition::from_parts(head, traj, data).expect("payload lengths follow the header")
    })
}

fn bits(acq: &Acquisition) -> (Vec<u32>, Vec<(u32, u32)>) {
    (
        acq.traj().iter().map(|v| v.to_bits()).collect(),
        acq.data().iter().map(|c| (c.re.to_bits(), c.im.to_bits())).collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever is appended reads back bit for bit, after a reopen
    #[test]
    fn test_append_read_round_trip(acqs in prop::collection::vec(arb_acquisition(), 1..8)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.mrd");

        let mut dataset = Dataset::open(&path, DatasetConfig::default()).unwrap();
        for acq in &acqs {
            dataset.append_acquisition(acq, None).unwrap();
        }
        dataset.close().unwrap();

        let mut dataset = Dataset::open(&path, DatasetConfig::read_only()).unwrap();
        prop_assert_eq!(dataset.number_of_acquisitions(None).unwrap(), acqs.len() as u64);
        for (n, expected) in acqs.iter().enumerate() {
            let actual = dataset.read_acquisition(n as u64, None).unwrap();
            prop_assert_eq!(actual.head().scan_counter, expected.head().scan_counter);
            prop_assert_eq!(actual.head().flags, expected.head().flags);
            prop_assert_eq!(actual.head().stream_number, expected.head().stream_number);
            prop_assert_eq!(bits(&actual), bits(expected));
        }
    }

    /// Stream lengths sum to the index length, and the k-th acquisition of
    /// stream s is the k-th one appended to s
    #[test]
    fn test_index_partitions_streams(streams in prop::collection::vec(0u16..4, 1..40)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.mrd");
        let mut dataset = Dataset::open(&path, DatasetConfig::default()).unwrap();

        for (n, stream) in streams.iter().enumerate() {
            let mut acq = Acquisition::new(2, 1, 0);
            acq.set_stream_number(*stream);
            let mut head = *acq.head();
            head.scan_counter = n as u32;
            acq.set_head(head);
            dataset.append_acquisition(&acq, None).unwrap();
        }

        let mut distinct: Vec<u16> = streams.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(dataset.streams().unwrap(), distinct.clone());

        let mut total = 0;
        for stream in &distinct {
            let expected: Vec<u32> = streams
                .iter()
                .enumerate()
                .filter(|(_, s)| *s == stream)
                .map(|(n, _)| n as u32)
                .collect();
            let count = dataset.number_of_acquisitions(Some(*stream)).unwrap();
            prop_assert_eq!(count, expected.len() as u64);
            for (k, scan) in expected.iter().enumerate() {
                let acq = dataset.read_acquisition(k as u64, Some(*stream)).unwrap();
                prop_assert_eq!(acq.head().scan_counter, *scan);
            }
            total += count;
        }
        prop_assert_eq!(total, dataset.number_of_acquisitions(None).unwrap());

        for n in 0..streams.len() {
            let acq = dataset.read_acquisition(n as u64, None).unwrap();
            prop_assert_eq!(acq.head().scan_counter, n as u32);
            prop_assert_eq!(acq.stream_number(), streams[n]);
        }
    }
}
