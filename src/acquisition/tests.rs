use super::*;

#[test]
fn test_new_sizes_payloads() {
    let acq = Acquisition::new(10, 4, 2);
    assert_eq!(acq.data().len(), 40);
    assert_eq!(acq.traj().len(), 20);
    assert_eq!(acq.head().complex_sample_count(), 40);
    assert_eq!(acq.head().trajectory_len(), 20);
}

#[test]
fn test_resize_zero_fills() {
    let mut acq = Acquisition::new(4, 1, 1);
    acq.data_mut()[0] = Complex32::new(3.0, 4.0);
    acq.resize(8, 2, 3);
    assert_eq!(acq.data().len(), 16);
    assert_eq!(acq.traj().len(), 24);
    assert!(acq.data().iter().all(|c| *c == Complex32::default()));
}

#[test]
fn test_set_head_resizes() {
    let mut acq = Acquisition::default();
    let head = AcquisitionHeader {
        number_of_samples: 16,
        active_channels: 2,
        trajectory_dimensions: 3,
        scan_counter: 99,
        ..AcquisitionHeader::default()
    };
    acq.set_head(head);
    assert_eq!(acq.head().scan_counter, 99);
    assert_eq!(acq.data().len(), 32);
    assert_eq!(acq.traj().len(), 48);
}

#[test]
fn test_from_parts_rejects_bad_lengths() {
    let head = AcquisitionHeader {
        number_of_samples: 4,
        active_channels: 2,
        trajectory_dimensions: 1,
        ..AcquisitionHeader::default()
    };

    let err = Acquisition::from_parts(head, vec![0.0; 3], vec![Complex32::default(); 8]).unwrap_err();
    assert_eq!(
        err,
        AcquisitionError::PayloadLength {
            field: "traj",
            expected: 4,
            actual: 3
        }
    );

    let err = Acquisition::from_parts(head, vec![0.0; 4], vec![Complex32::default(); 7]).unwrap_err();
    assert!(matches!(err, AcquisitionError::PayloadLength { field: "data", .. }));

    assert!(Acquisition::from_parts(head, vec![0.0; 4], vec![Complex32::default(); 8]).is_ok());
}

#[test]
fn test_sample_indexing_is_channel_major() {
    let mut acq = AcquisitionBuilder::new(5, 3).build();
    assert!(acq.set_sample(2, 1, Complex32::new(1.5, -2.5)));
    assert_eq!(acq.data()[2 * 5 + 1], Complex32::new(1.5, -2.5));
    assert_eq!(acq.sample(2, 1), Some(Complex32::new(1.5, -2.5)));
    assert_eq!(acq.sample(3, 0), None);
    assert!(!acq.set_sample(0, 5, Complex32::default()));
}

#[test]
fn test_traj_value() {
    let mut acq = AcquisitionBuilder::new(3, 1).trajectory_dimensions(2).build();
    acq.traj_mut()[2 * 2 + 1] = 0.25;
    assert_eq!(acq.traj_value(2, 1), Some(0.25));
    assert_eq!(acq.traj_value(2, 2), None);
    assert_eq!(acq.traj_value(3, 0), None);
}

#[test]
fn test_flags() {
    let mut head = AcquisitionHeader::default();
    head.set_flag(1);
    head.set_flag(64);
    head.set_flag(0);
    head.set_flag(65);
    assert!(head.is_flag_set(1));
    assert!(head.is_flag_set(64));
    assert!(!head.is_flag_set(2));
    assert_eq!(head.flags, 1 | (1 << 63));
    head.clear_flag(1);
    assert!(!head.is_flag_set(1));
}

#[test]
fn test_builder_fields() {
    let acq = AcquisitionBuilder::new(10, 4)
        .trajectory_dimensions(2)
        .stream_number(7)
        .scan_counter(11)
        .measurement_uid(42)
        .acquisition_time_stamp(1000)
        .sample_time_us(2.5)
        .flag(3)
        .idx(EncodingCounters {
            kspace_encode_step_1: 5,
            slice: 2,
            ..EncodingCounters::default()
        })
        .build();

    assert_eq!(acq.stream_number(), 7);
    assert_eq!(acq.head().scan_counter, 11);
    assert_eq!(acq.head().measurement_uid, 42);
    assert_eq!(acq.head().available_channels, 4);
    assert_eq!(acq.idx().kspace_encode_step_1, 5);
    assert_eq!(acq.idx().slice, 2);
    assert!(acq.head().is_flag_set(3));
    assert_eq!(acq.data().len(), 40);
    assert_eq!(acq.traj().len(), 20);
}

#[test]
fn test_samples_support_complex_arithmetic() {
    let mut acq = Acquisition::new(2, 1, 0);
    assert!(acq.set_sample(0, 0, Complex32::new(3.0, 4.0)));
    assert!(acq.set_sample(0, 1, Complex32::new(0.0, 1.0)));

    let first = acq.sample(0, 0).unwrap();
    let second = acq.sample(0, 1).unwrap();
    assert_eq!(first.norm(), 5.0);
    assert_eq!(first.conj(), Complex32::new(3.0, -4.0));
    assert_eq!(first * second, Complex32::new(-4.0, 3.0));
}
