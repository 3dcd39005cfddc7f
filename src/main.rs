use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use jdrkit::{export_file, init_logging, Config, ExportFormat, BUILD_DATE};

/// JDRKit command line tool
///
/// Examples:
///   jdrkit export drawing.json                     # SVG to stdout
///   jdrkit export drawing.json --format eps -o a.eps
///   jdrkit export drawing.json --config jdr.toml   # precision etc. from a config file
#[derive(Parser, Debug)]
#[clap(name = "jdrkit", version, about = "Vector drawing object model tools")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a JSON drawing file to SVG, EPS or PGF
    Export {
        /// Drawing file to read
        input: PathBuf,

        /// Output format (svg, eps or pgf); defaults to the configured format
        #[clap(long, short = 'f')]
        format: Option<ExportFormat>,

        /// Output file; stdout when omitted
        #[clap(long, short = 'o')]
        out: Option<PathBuf>,

        /// Configuration file (.toml or .json)
        #[clap(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            Config::load_from_file(&path).with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            Err(_) => Ok(Config::default()),
        },
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    debug!("jdrkit {} built {}", jdrkit::VERSION, BUILD_DATE);

    let cli = Cli::parse();
    match cli.command {
        Command::Export {
            input,
            format,
            out,
            config,
        } => {
            let config = load_config(config)?;
            let format = format.unwrap_or(config.export.format);
            export_file(&input, out.as_deref(), format, &config)
        }
    }
}
