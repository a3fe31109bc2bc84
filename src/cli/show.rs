use anyhow::{Context, Result};
use std::path::PathBuf;

use mrdset::dataset::{Dataset, DatasetConfig};

/// Print the header of one acquisition as JSON
pub fn run(file: PathBuf, group: &str, index: u64, stream: Option<u16>) -> Result<()> {
    let config = DatasetConfig::read_only().with_group_name(group);
    let mut dataset = Dataset::open(&file, config).context("Failed to open dataset")?;

    let acq = dataset
        .read_acquisition(index, stream)
        .with_context(|| match stream {
            Some(stream) => format!("Failed to read acquisition {} of stream {}", index, stream),
            None => format!("Failed to read acquisition {}", index),
        })?;

    let output = serde_json::json!({
        "head": acq.head(),
        "trajectory_values": acq.traj().len(),
        "complex_samples": acq.data().len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
