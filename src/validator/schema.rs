use anyhow::Result;

use crate::container::{ArrayHandle, Container, NodeKind};
use crate::record::{AcquisitionRecord, HeaderDocument, IndexEntry, Record};
use crate::schema::{TypeDescriptor, INDEX_TABLE_NAME, TABLE_ELEMENT_SHAPE};

use super::{CheckedArrays, DatasetPaths, ValidationCheck, ValidationReport};

/// Step 2: Schema contract validation
pub(crate) fn check_schema_contract(
    container: &Container,
    paths: &DatasetPaths,
    report: &mut ValidationReport,
) -> Result<CheckedArrays> {
    let mut arrays = CheckedArrays::default();

    match container.node_kind(&paths.index) {
        Some(NodeKind::Array) => {
            arrays.index = check_table(
                container,
                &paths.index,
                IndexEntry::type_descriptor(),
                report,
            )?;
        }
        Some(NodeKind::Group) => {
            report.add_check(ValidationCheck::failed(
                format!("Layout of {}", paths.index),
                "Path holds a group, not an array",
            ));
        }
        None => {
            report.add_check(ValidationCheck::warning(
                "Index array present",
                "No acquisitions have been indexed",
            ));
        }
    }

    let mut unexpected = Vec::new();
    for name in container.children(&paths.data)? {
        if name == INDEX_TABLE_NAME {
            continue;
        }
        let Ok(stream) = name.parse::<u16>() else {
            unexpected.push(name);
            continue;
        };
        let path = format!("{}/{}", paths.data, name);
        if container.node_kind(&path) != Some(NodeKind::Array) {
            report.add_check(ValidationCheck::failed(
                format!("Layout of {}", path),
                "Path holds a group, not an array",
            ));
            continue;
        }
        if let Some(handle) =
            check_table(container, &path, AcquisitionRecord::type_descriptor(), report)?
        {
            arrays.streams.insert(u32::from(stream), handle);
        }
    }
    if !unexpected.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Data group entries",
            format!("Unexpected entries: {}", unexpected.join(", ")),
        ));
    }
    report.add_check(ValidationCheck::ok(format!(
        "Streams found: {}",
        arrays.streams.len()
    )));

    check_header(container, paths, report)?;

    Ok(arrays)
}

/// Verify a growable table's element type and shape
fn check_table(
    container: &Container,
    path: &str,
    expected: &TypeDescriptor,
    report: &mut ValidationReport,
) -> Result<Option<ArrayHandle>> {
    let name = format!("Layout of {}", path);
    let handle = container.open_array(path)?;

    let actual = container.type_of(handle)?;
    if actual != expected {
        report.add_check(ValidationCheck::failed(
            name,
            format!("element type is {}, expected {}", actual, expected),
        ));
        return Ok(None);
    }

    let extent = container.extent(handle)?;
    if extent.len() != TABLE_ELEMENT_SHAPE.len() || extent[1..] != TABLE_ELEMENT_SHAPE[1..] {
        report.add_check(ValidationCheck::failed(
            name,
            format!("extent {:?} does not match element shape {:?}", extent, TABLE_ELEMENT_SHAPE),
        ));
        return Ok(None);
    }

    report.add_check(ValidationCheck::ok(name));
    Ok(Some(handle))
}

fn check_header(
    container: &Container,
    paths: &DatasetPaths,
    report: &mut ValidationReport,
) -> Result<()> {
    let name = "XML header";
    match container.node_kind(&paths.xml) {
        None => {
            report.add_check(ValidationCheck::warning(
                name,
                format!("No header document at {}", paths.xml),
            ));
        }
        Some(NodeKind::Group) => {
            report.add_check(ValidationCheck::failed(
                name,
                "Path holds a group, not an array",
            ));
        }
        Some(NodeKind::Array) => {
            let handle = container.open_array(&paths.xml)?;
            let actual = container.type_of(handle)?;
            if actual != HeaderDocument::type_descriptor() {
                report.add_check(ValidationCheck::failed(
                    name,
                    format!("element type is {}, expected vlen<str>", actual),
                ));
                return Ok(());
            }
            if container.extent(handle)? != [1u64] {
                report.add_check(ValidationCheck::failed(
                    name,
                    format!("extent {:?}, expected [1]", container.extent(handle)?),
                ));
                return Ok(());
            }
            let elements = container.read_hyperslab(handle, &[0], &[1])?;
            match elements.first().map(|bytes| HeaderDocument::decode(bytes)) {
                Some(Ok(doc)) if !doc.0.is_empty() => {
                    report.add_check(ValidationCheck::ok(name));
                }
                Some(Ok(_)) => {
                    report.add_check(ValidationCheck::warning(name, "Header document is empty"));
                }
                Some(Err(e)) => {
                    report.add_check(ValidationCheck::failed(name, e.to_string()));
                }
                None => {
                    report.add_check(ValidationCheck::failed(name, "Header array is empty"));
                }
            }
        }
    }
    Ok(())
}
