use super::*;
use crate::acquisition::AcquisitionBuilder;
use crate::container::{AccessMode, Container};
use crate::dataset::{Dataset, DatasetConfig};
use crate::record::{AcquisitionRecord, Record};
use crate::schema::{PrimitiveKind, TypeDescriptor};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_dataset(path: &Path, streams: &[u16]) -> Result<(), Box<dyn std::error::Error>> {
    let mut dataset = Dataset::open(path, DatasetConfig::default())?;
    dataset.write_header("<ismrmrdHeader/>")?;
    for (i, stream) in streams.iter().enumerate() {
        let acq = AcquisitionBuilder::new(8, 2)
            .stream_number(*stream)
            .scan_counter(i as u32)
            .build();
        dataset.append_acquisition(&acq, None)?;
    }
    dataset.close()?;
    Ok(())
}

fn failed(report: &ValidationReport, name: &str) -> bool {
    report
        .checks
        .iter()
        .any(|c| c.name.starts_with(name) && c.status.is_failed())
}

#[test]
fn test_validation_report_display() {
    let mut report = ValidationReport::new("test.mrd");
    report.add_check(ValidationCheck::ok("Test check 1"));
    report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Test check 3", "This failed"));

    let output = format!("{}", report);
    assert!(output.contains("mrdset Validation Report"));
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
}

#[test]
fn test_report_serializes_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut report = ValidationReport::new("test.mrd");
    report.add_check(ValidationCheck::failed("Index", "drift"));

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["file_path"], "test.mrd");
    assert_eq!(json["checks"][0]["status"]["status"], "failed");
    assert_eq!(json["checks"][0]["status"]["message"], "drift");
    Ok(())
}

#[test]
fn test_valid_dataset_passes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("valid.mrd");
    write_dataset(&path, &[0, 1, 0, 0, 1])?;

    let report = validate_dataset(&path, "/dataset")?;
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    assert!(report.check("Streams found: 2").is_some());
    assert!(report
        .check("Index length matches streams (5 acquisitions)")
        .is_some());
    Ok(())
}

#[test]
fn test_missing_path_is_error() {
    let dir = tempdir().unwrap();
    assert!(validate_dataset(&dir.path().join("absent.mrd"), "/dataset").is_err());
}

#[test]
fn test_foreign_file_fails_structure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("plain.mrd");
    File::create(&path)?.write_all(b"hello")?;

    let report = validate_dataset(&path, "/dataset")?;
    assert!(failed(&report, "Format: mrdset container"));
    Ok(())
}

#[test]
fn test_wrong_group_fails_structure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("group.mrd");
    write_dataset(&path, &[0])?;

    let report = validate_dataset(&path, "/elsewhere")?;
    assert!(failed(&report, "/elsewhere/data group exists"));
    Ok(())
}

#[test]
fn test_detects_unindexed_record() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("drift.mrd");
    write_dataset(&path, &[0, 0])?;

    // Simulate an append that failed between the stream write and the index write
    {
        let mut file = Container::open(&path, AccessMode::ReadWrite)?;
        let array = file.open_array("/dataset/data/0")?;
        let extra = AcquisitionRecord {
            head: AcquisitionBuilder::new(8, 2).build().head().clone(),
            traj: Vec::new(),
            data: vec![0.0; 32],
        };
        file.extend_array(array, &[3, 1])?;
        file.write_hyperslab(array, &[2, 0], &[1, 1], vec![extra.encode()])?;
        file.close()?;
    }

    let report = validate_dataset(&path, "/dataset")?;
    let check = report
        .check("Index length matches streams")
        .ok_or("missing index length check")?;
    assert_eq!(
        check.status,
        CheckStatus::Failed("index holds 2 entries, streams hold 3 records".to_string())
    );
    assert!(failed(&report, "Every stream record indexed"));
    assert!(!failed(&report, "Index entries in range"));
    Ok(())
}

#[test]
fn test_detects_wrong_layout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("layout.mrd");
    write_dataset(&path, &[0])?;
    {
        let mut file = Container::open(&path, AccessMode::ReadWrite)?;
        let dtype = TypeDescriptor::primitive(PrimitiveKind::F32);
        file.create_array("/dataset/data/5", &dtype, &[1, 1], &[None, Some(1)], &[1, 1])?;
        file.close()?;
    }

    let report = validate_dataset(&path, "/dataset")?;
    assert!(failed(&report, "Layout of /dataset/data/5"));
    assert!(report.check("Streams found: 1").is_some());
    Ok(())
}

#[test]
fn test_stream_override_warns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path: PathBuf = dir.path().join("override.mrd");
    {
        let mut dataset = Dataset::open(&path, DatasetConfig::default())?;
        dataset.write_header("<ismrmrdHeader/>")?;
        dataset.append_acquisition(&AcquisitionBuilder::new(4, 1).build(), Some(7))?;
        dataset.close()?;
    }

    let report = validate_dataset(&path, "/dataset")?;
    assert!(!report.has_failures(), "{}", report);
    let check = report.check("Records of stream 7").ok_or("missing record check")?;
    assert!(check.status.is_warning());
    Ok(())
}

#[test]
fn test_missing_header_warns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("no_header.mrd");
    Dataset::open(&path, DatasetConfig::default())?.close()?;

    let report = validate_dataset(&path, "/dataset")?;
    assert!(!report.has_failures(), "{}", report);
    assert!(report.check("XML header").is_some_and(|c| c.status.is_warning()));
    assert!(report.check("Index array present").is_some());
    Ok(())
}

#[test]
fn test_counts_tally_outcomes() {
    let mut report = ValidationReport::new("test.mrd");
    report.add_check(ValidationCheck::ok("a"));
    report.add_check(ValidationCheck::ok("b"));
    report.add_check(ValidationCheck::warning("c", "note"));

    let counts = report.counts();
    assert_eq!(
        counts,
        CheckCounts {
            passed: 2,
            warnings: 1,
            failed: 0
        }
    );
    assert_eq!(counts.to_string(), "2 passed, 1 warnings, 0 failed");
    assert!(report.to_string().contains("Validation PASSED with warnings"));
}
