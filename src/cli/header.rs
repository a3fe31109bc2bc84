use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mrdset::dataset::{Dataset, DatasetConfig};

/// Print the stored XML header, or replace it with the content of `set`
pub fn run(file: PathBuf, group: &str, set: Option<PathBuf>) -> Result<()> {
    let Some(source) = set else {
        let config = DatasetConfig::read_only().with_group_name(group);
        let dataset = Dataset::open(&file, config).context("Failed to open dataset")?;
        let xml = dataset.read_header().context("Failed to read XML header")?;
        println!("{}", xml);
        return Ok(());
    };

    let xml = std::fs::read_to_string(&source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let config = DatasetConfig::default()
        .with_group_name(group)
        .with_create_if_missing(false);
    let mut dataset = Dataset::open(&file, config).context("Failed to open dataset")?;
    dataset.write_header(&xml).context("Failed to write XML header")?;
    dataset.close().context("Failed to close dataset")?;

    info!("Wrote {} byte header to {}", xml.len(), file.display());
    Ok(())
}
