use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate dataset consistency
pub fn run(file: PathBuf, group: &str, json: bool) -> Result<()> {
    use mrdset::validator::validate_dataset;

    info!("mrdset Validator");
    info!("================");
    info!("File: {}", file.display());
    info!("Group: {}", group);

    // Run validation
    match validate_dataset(&file, group) {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                // Use colorized output if available
                #[cfg(feature = "colorized_output")]
                {
                    println!("{}", report.format_colored());
                }

                #[cfg(not(feature = "colorized_output"))]
                {
                    println!("{}", report);
                }
            }

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
