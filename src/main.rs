//! # mrdset
//!
//! A command-line tool for inspecting and generating mrdset acquisition datasets.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic two-stream dataset
//! mrdset demo scan.mrd -n 256 -s 2
//!
//! # Inspect it
//! mrdset info scan.mrd
//! mrdset show scan.mrd 17
//! mrdset header scan.mrd
//!
//! # Check index/stream consistency
//! mrdset validate scan.mrd --json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    dispatch(cli)
}
