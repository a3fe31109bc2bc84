use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod header;
mod info;
mod show;
mod validate;

pub use config::Config;

/// mrdset - streamed MR acquisition datasets
#[derive(Parser)]
#[command(name = "mrdset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Base group of the dataset (overrides the config file)
    #[arg(short = 'g', long, value_name = "GROUP", global = true)]
    group: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic multi-stream dataset
    Demo {
        /// Output container path
        #[arg(value_name = "OUTPUT", default_value = "demo.mrd")]
        output: PathBuf,

        /// Number of acquisitions to append
        #[arg(short = 'n', long, default_value_t = 64)]
        acquisitions: u32,

        /// Number of streams to spread acquisitions over
        #[arg(short = 's', long, default_value_t = 2)]
        streams: u16,

        /// Samples per readout
        #[arg(long, default_value_t = 128)]
        samples: u16,

        /// Receiver channels
        #[arg(long, default_value_t = 4)]
        channels: u16,
    },

    /// Display information about a dataset
    Info {
        /// Input container path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print one acquisition header as JSON
    Show {
        /// Input container path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Global acquisition number, or offset within --stream
        #[arg(value_name = "INDEX")]
        index: u64,

        /// Read from this stream instead of resolving through the index
        #[arg(long)]
        stream: Option<u16>,
    },

    /// Print or replace the XML header document
    Header {
        /// Container path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Replace the header with the content of this file
        #[arg(long, value_name = "XML_FILE")]
        set: Option<PathBuf>,
    },

    /// Validate dataset consistency
    Validate {
        /// Input container path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let group = config.group_name(cli.group);

    match cli.command {
        Commands::Demo {
            output,
            acquisitions,
            streams,
            samples,
            channels,
        } => demo::run(output, &group, acquisitions, streams, samples, channels),
        Commands::Info { file } => info::run(file, &group),
        Commands::Show {
            file,
            index,
            stream,
        } => show::run(file, &group, index, stream),
        Commands::Header { file, set } => header::run(file, &group, set),
        Commands::Validate { file, json } => validate::run(file, &group, json),
    }
}
