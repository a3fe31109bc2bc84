use anyhow::{Context, Result};
use std::path::PathBuf;

use mrdset::dataset::{Dataset, DatasetConfig, DatasetError};

/// Display information about a dataset
pub fn run(file: PathBuf, group: &str) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let config = DatasetConfig::read_only().with_group_name(group);
    let mut dataset = Dataset::open(&file, config).context("Failed to open dataset")?;
    let info = dataset.info().clone();

    println!("mrdset File Information");
    println!("=======================");
    println!("File: {}", file.display());
    println!();

    println!("Container:");
    println!("  Format version: {}", info.format_version);
    println!("  Container ID: {}", info.container_id);
    println!("  Created: {}", info.created.to_rfc3339());
    println!("  Modified: {}", info.modified.to_rfc3339());
    let file_size = std::fs::metadata(&file).map(|m| m.len()).unwrap_or(0);
    println!("  Size: {} bytes ({:.2} MB)", file_size, file_size as f64 / 1024.0 / 1024.0);
    println!();

    println!("Dataset {}:", dataset.group_name());
    match dataset.read_header() {
        Ok(xml) => println!("  XML header: {} bytes", xml.len()),
        Err(DatasetError::NotFound(_)) => println!("  XML header: <none>"),
        Err(e) => println!("  XML header: unreadable ({})", e),
    }

    match dataset.number_of_acquisitions(None) {
        Ok(total) => println!("  Indexed acquisitions: {}", total),
        Err(DatasetError::NotFound(_)) => println!("  Indexed acquisitions: 0"),
        Err(e) => return Err(e).context("Failed to read index"),
    }

    let streams = dataset.streams().context("Failed to list streams")?;
    if streams.is_empty() {
        println!("  Streams: <none>");
        return Ok(());
    }

    println!("  Streams:");
    for stream in streams {
        let count = dataset
            .number_of_acquisitions(Some(stream))
            .with_context(|| format!("Failed to read stream {}", stream))?;
        let first = dataset
            .read_acquisition(0, Some(stream))
            .with_context(|| format!("Failed to read first acquisition of stream {}", stream))?;
        println!(
            "    {:>5}: {} acquisitions ({} samples x {} channels, {}D trajectory)",
            stream,
            count,
            first.number_of_samples(),
            first.active_channels(),
            first.trajectory_dimensions()
        );
    }

    Ok(())
}
