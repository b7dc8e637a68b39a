//! printloop CLI - Command-line front end for the transformation engine
//!
//! Usage:
//!   printloop process <input.gcode> -o <looped.gcode> --printer bambu-lab-a1 -n 5
//!   printloop process <input.gcode> -o <looped.gcode> --template my-printer.toml -n 3
//!   printloop list-printers

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use printloop::{init_logging, transform, PrinterCatalog, ProcessingRequest};

/// Repeat a print job: eject the finished part and start the next copy
#[derive(Parser, Debug)]
#[command(name = "printloop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a G-code file into a looped one
    Process {
        /// Input G-code file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output G-code file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Printer name from the embedded catalog (e.g. 'bambu-lab-a1')
        #[arg(long, default_value = "bambu-lab-a1")]
        printer: String,

        /// Number of copies to print
        #[arg(short = 'n', long, default_value = "2")]
        iterations: i64,

        /// Bed temperature to cool down to before ejecting, in degrees C
        #[arg(long, default_value = "28")]
        bed_cooldown_temp: i64,

        /// Extra minutes to wait before ejecting
        #[arg(long, default_value = "0")]
        wait_min: i64,

        /// Extra filament to extrude before restarting, in mm
        #[arg(long, default_value = "0.0")]
        extra_extrude: f64,

        /// Custom printer definition file, overriding the catalog
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,
    },

    /// List the printers in the embedded catalog
    ListPrinters,
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            printer,
            iterations,
            bed_cooldown_temp,
            wait_min,
            extra_extrude,
            template,
        } => {
            let custom_template = template
                .map(|path| {
                    fs::read_to_string(&path)
                        .with_context(|| format!("failed to read template {}", path.display()))
                })
                .transpose()?;

            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let request = ProcessingRequest {
                file_name,
                iterations,
                wait_bed_cooldown_temp: bed_cooldown_temp,
                wait_min,
                extra_extrude,
                printer,
                custom_template,
            };

            transform(&input, &output, &request)
                .with_context(|| format!("failed to process {}", input.display()))?;

            println!("Wrote {}", output.display());
        }

        Commands::ListPrinters => {
            for name in PrinterCatalog::names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
