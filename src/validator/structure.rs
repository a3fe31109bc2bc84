use std::path::Path;

use anyhow::Result;

use crate::container::{is_recognized_format, AccessMode, Container, NodeKind};
use crate::schema::MRDSET_FORMAT_VERSION;

use super::{DatasetPaths, ValidationCheck, ValidationError, ValidationReport};

/// Step 1: Structure validation.
///
/// Returns the opened container, or `None` when later steps cannot run.
pub(crate) fn check_structure(
    path: &Path,
    paths: &DatasetPaths,
    report: &mut ValidationReport,
) -> Result<Option<Container>> {
    if !path.exists() {
        report.add_check(ValidationCheck::failed(
            "Path exists",
            format!("Path does not exist: {}", path.display()),
        ));
        anyhow::bail!(ValidationError::StructureError("Path does not exist".to_string()));
    }
    report.add_check(ValidationCheck::ok("Path exists"));

    if !path.is_file() {
        report.add_check(ValidationCheck::failed(
            "Valid file type",
            "Path is not a regular file",
        ));
        return Ok(None);
    }

    if !is_recognized_format(path) {
        report.add_check(ValidationCheck::failed(
            "Format: mrdset container",
            "Not a ZIP archive starting with the mrdset mimetype",
        ));
        return Ok(None);
    }
    report.add_check(ValidationCheck::ok("Format: mrdset container (.mrd)"));

    let container = match Container::open(path, AccessMode::ReadOnly) {
        Ok(container) => container,
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                "Manifest readable",
                format!("Cannot load container: {}", e),
            ));
            return Ok(None);
        }
    };
    report.add_check(ValidationCheck::ok("Manifest readable"));

    let version = &container.info().format_version;
    if version == MRDSET_FORMAT_VERSION {
        report.add_check(ValidationCheck::ok(format!("Format version {}", version)));
    } else {
        report.add_check(ValidationCheck::warning(
            "Format version",
            format!("written as {}, this reader supports {}", version, MRDSET_FORMAT_VERSION),
        ));
    }

    match container.node_kind(&paths.data) {
        Some(NodeKind::Group) => {
            report.add_check(ValidationCheck::ok(format!("{} group exists", paths.data)));
            Ok(Some(container))
        }
        Some(NodeKind::Array) => {
            report.add_check(ValidationCheck::failed(
                format!("{} group exists", paths.data),
                "Path holds an array, not a group",
            ));
            Ok(None)
        }
        None => {
            report.add_check(ValidationCheck::failed(
                format!("{} group exists", paths.data),
                "Missing data group",
            ));
            Ok(None)
        }
    }
}
