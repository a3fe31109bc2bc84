use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mrdset::acquisition::{Acquisition, AcquisitionBuilder, Complex32, EncodingCounters};
use mrdset::dataset::{Dataset, DatasetConfig};

const DWELL_TIME_US: f32 = 2.5;

/// Generate a demo dataset of synthetic acquisitions
pub fn run(
    output: PathBuf,
    group: &str,
    acquisitions: u32,
    streams: u16,
    samples: u16,
    channels: u16,
) -> Result<()> {
    info!("mrdset Demo Generator");
    info!("=====================");

    if streams == 0 {
        anyhow::bail!("At least one stream is required");
    }
    if output.exists() {
        std::fs::remove_file(&output)
            .with_context(|| format!("Failed to replace {}", output.display()))?;
    }

    info!("Creating dataset: {}", output.display());
    let config = DatasetConfig::default().with_group_name(group);
    let mut dataset = Dataset::open(&output, config).context("Failed to create dataset")?;

    dataset
        .write_header(&demo_header(samples, channels, acquisitions))
        .context("Failed to write XML header")?;

    info!(
        "Writing {} acquisitions over {} streams ({} samples x {} channels each)...",
        acquisitions, streams, samples, channels
    );

    for scan in 0..acquisitions {
        let acq = synthetic_acquisition(scan, streams, samples, channels);
        dataset
            .append_acquisition(&acq, None)
            .with_context(|| format!("Failed to append acquisition {}", scan))?;

        if (scan + 1) % 100 == 0 {
            info!("  Written {} acquisitions...", scan + 1);
        }
    }

    let indexed = dataset.number_of_acquisitions(None).unwrap_or(0);
    let stream_list = dataset.streams().context("Failed to list streams")?;
    dataset.close().context("Failed to close dataset")?;

    info!("Generation complete!");
    info!("  Output file: {}", output.display());
    info!("  Acquisitions indexed: {}", indexed);
    info!("  Streams: {:?}", stream_list);

    let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    info!(
        "  File size: {} bytes ({:.2} MB)",
        file_size,
        file_size as f64 / 1024.0 / 1024.0
    );

    Ok(())
}

/// Round-robin over streams; stream 1 and up carry a 2D trajectory
fn synthetic_acquisition(scan: u32, streams: u16, samples: u16, channels: u16) -> Acquisition {
    let stream = (scan % u32::from(streams)) as u16;
    let line = (scan / u32::from(streams)) as u16;
    let trajectory_dimensions = if stream == 0 { 0 } else { 2 };

    let idx = EncodingCounters {
        kspace_encode_step_1: line,
        ..EncodingCounters::default()
    };

    let mut acq = AcquisitionBuilder::new(samples, channels)
        .trajectory_dimensions(trajectory_dimensions)
        .stream_number(stream)
        .scan_counter(scan)
        .acquisition_time_stamp(scan * 4)
        .sample_time_us(DWELL_TIME_US)
        .idx(idx)
        .build();

    let n = f32::from(samples.max(1));
    for channel in 0..usize::from(channels) {
        let gain = 1.0 / (channel as f32 + 1.0);
        for sample in 0..usize::from(samples) {
            let phase = std::f32::consts::TAU * (sample as f32 + f32::from(line)) / n;
            acq.set_sample(
                channel,
                sample,
                Complex32::new(gain * phase.cos(), gain * phase.sin()),
            );
        }
    }

    if trajectory_dimensions == 2 {
        let angle = std::f32::consts::PI * f32::from(line) / 16.0;
        let traj = acq.traj_mut();
        for sample in 0..usize::from(samples) {
            let radius = sample as f32 / n - 0.5;
            traj[sample * 2] = radius * angle.cos();
            traj[sample * 2 + 1] = radius * angle.sin();
        }
    }

    acq
}

fn demo_header(samples: u16, channels: u16, acquisitions: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ismrmrdHeader>
  <acquisitionSystemInformation>
    <systemVendor>mrdset</systemVendor>
    <receiverChannels>{channels}</receiverChannels>
  </acquisitionSystemInformation>
  <encoding>
    <encodedSpace>
      <matrixSize><x>{samples}</x><y>{acquisitions}</y><z>1</z></matrixSize>
    </encodedSpace>
    <trajectory>cartesian</trajectory>
  </encoding>
</ismrmrdHeader>
"#
    )
}
