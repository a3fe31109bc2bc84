use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use crate::container::Container;
use crate::record::{AcquisitionRecord, IndexEntry, Record};

use super::{CheckedArrays, ValidationCheck, ValidationReport};

/// Problems listed in a failed check before the rest are summarized
const MAX_LISTED: usize = 5;

fn summarize(problems: &[String]) -> String {
    let mut message = problems
        .iter()
        .take(MAX_LISTED)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if problems.len() > MAX_LISTED {
        message.push_str(&format!(" (and {} more)", problems.len() - MAX_LISTED));
    }
    message
}

/// Step 3: Index consistency validation
pub(crate) fn check_index_consistency(
    container: &Container,
    arrays: &CheckedArrays,
    report: &mut ValidationReport,
) -> Result<()> {
    let mut stream_lengths = BTreeMap::new();
    for (stream, handle) in &arrays.streams {
        stream_lengths.insert(*stream, container.extent(*handle)?[0]);
    }
    let total: u64 = stream_lengths.values().sum();

    let Some(index) = arrays.index else {
        if total == 0 {
            report.add_check(ValidationCheck::ok("Index length matches streams"));
        } else {
            report.add_check(ValidationCheck::failed(
                "Index length matches streams",
                format!("No usable index, but streams hold {} acquisitions", total),
            ));
        }
        return Ok(());
    };

    let length = container.extent(index)?[0];
    if length == total {
        report.add_check(ValidationCheck::ok(format!(
            "Index length matches streams ({} acquisitions)",
            length
        )));
    } else {
        report.add_check(ValidationCheck::failed(
            "Index length matches streams",
            format!("index holds {} entries, streams hold {} records", length, total),
        ));
    }

    let elements = container.read_hyperslab(index, &[0, 0], &[length, 1])?;
    let mut seen = BTreeSet::new();
    let mut indexed: BTreeMap<u32, u64> = BTreeMap::new();
    let mut problems = Vec::new();

    for (n, bytes) in elements.iter().enumerate() {
        let entry = match IndexEntry::decode(bytes) {
            Ok(entry) => entry,
            Err(e) => {
                problems.push(format!("entry {}: {}", n, e));
                continue;
            }
        };
        match stream_lengths.get(&entry.stream) {
            None => problems.push(format!("entry {} names missing stream {}", n, entry.stream)),
            Some(len) if u64::from(entry.index) >= *len => problems.push(format!(
                "entry {} points to stream {} offset {} beyond length {}",
                n, entry.stream, entry.index, len
            )),
            Some(_) => {
                if !seen.insert((entry.stream, entry.index)) {
                    problems.push(format!(
                        "entry {} repeats stream {} offset {}",
                        n, entry.stream, entry.index
                    ));
                    continue;
                }
                *indexed.entry(entry.stream).or_default() += 1;
            }
        }
    }

    if problems.is_empty() {
        report.add_check(ValidationCheck::ok("Index entries in range"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Index entries in range",
            summarize(&problems),
        ));
    }

    let unindexed: Vec<String> = stream_lengths
        .iter()
        .filter_map(|(stream, len)| {
            let count = indexed.get(stream).copied().unwrap_or(0);
            (count != *len).then(|| format!("stream {}: {} of {} records indexed", stream, count, len))
        })
        .collect();
    if unindexed.is_empty() {
        report.add_check(ValidationCheck::ok("Every stream record indexed"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Every stream record indexed",
            summarize(&unindexed),
        ));
    }

    Ok(())
}

/// Step 4: Record sanity validation
pub(crate) fn check_record_sanity(
    container: &Container,
    arrays: &CheckedArrays,
    report: &mut ValidationReport,
) -> Result<()> {
    for (stream, handle) in &arrays.streams {
        let name = format!("Records of stream {}", stream);
        let length = container.extent(*handle)?[0];
        let elements = container.read_hyperslab(*handle, &[0, 0], &[length, 1])?;

        let mut problems = Vec::new();
        let mut foreign_stream = 0usize;
        for (n, bytes) in elements.iter().enumerate() {
            let record = match AcquisitionRecord::decode(bytes) {
                Ok(record) => record,
                Err(e) => {
                    problems.push(format!("record {}: {}", n, e));
                    continue;
                }
            };
            let expected_data = 2 * record.head.complex_sample_count();
            if record.data.len() != expected_data {
                problems.push(format!(
                    "record {}: {} data values, header declares {}",
                    n,
                    record.data.len(),
                    expected_data
                ));
            }
            if record.traj.len() != record.head.trajectory_len() {
                problems.push(format!(
                    "record {}: {} trajectory values, header declares {}",
                    n,
                    record.traj.len(),
                    record.head.trajectory_len()
                ));
            }
            if u32::from(record.head.stream_number) != *stream {
                foreign_stream += 1;
            }
        }

        if !problems.is_empty() {
            report.add_check(ValidationCheck::failed(name, summarize(&problems)));
        } else if foreign_stream > 0 {
            // Appending with a stream override stores the original header
            report.add_check(ValidationCheck::warning(
                name,
                format!(
                    "{} of {} headers carry a different stream_number",
                    foreign_stream, length
                ),
            ));
        } else {
            report.add_check(ValidationCheck::ok(format!("{} ({} records)", name, length)));
        }
    }
    Ok(())
}
