mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use cutsheet_core::extraction::pdftotext::TextMode;
use cutsheet_core::layout::LayoutPreference;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cutsheet",
    version,
    about = "Extract nesting, parts and material tables from laser-cutting report PDFs"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// pdftotext text mode for PDF input: raw or layout
    #[arg(long, global = true, value_name = "MODE", default_value = "raw")]
    text_mode: TextMode,

    #[command(subcommand)]
    command: Commands,
}

/// Which table(s) to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    All,
    Subnest,
    Parts,
    Material,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a report (PDF, or already decoded .txt) into rows
    Parse {
        /// Path to PDF or decoded text file
        input_file: PathBuf,

        /// Table to extract
        #[arg(short, long, value_enum, default_value = "all")]
        section: SectionArg,

        /// Layout family: auto, legacy or nest (overrides the config file)
        #[arg(short, long)]
        layout: Option<LayoutPreference>,

        /// Return an empty nesting summary instead of placeholder rows
        #[arg(long)]
        no_placeholder: bool,

        /// JSON parse options file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the decoded flat text of a PDF
    Text {
        /// Path to PDF file
        pdf_file: PathBuf,
    },
    /// Print the position fragments of a PDF
    Fragments {
        /// Path to PDF file
        pdf_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            section,
            layout,
            no_placeholder,
            config,
            output,
            out,
        } => commands::parse::run(commands::parse::ParseArgs {
            input_file,
            section,
            layout,
            no_placeholder,
            config,
            output_format: output,
            output_file: out,
            text_mode: cli.text_mode,
        }),
        Commands::Text { pdf_file } => commands::decode::text(&pdf_file, cli.text_mode),
        Commands::Fragments { pdf_file, output } => {
            commands::decode::fragments(&pdf_file, cli.text_mode, &output)
        }
    };

    if let Err(e) = result {
        log::debug!("command failed: {e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
