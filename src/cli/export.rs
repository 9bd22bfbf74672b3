//! CLI commands for data export
//!
//! Exports the entries of a cycle as CSV, or the cycle report as text.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{PeculeError, PeculeResult};
use crate::export::{build_cycle_report, export_cycle_csv};
use crate::services::CycleService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the entries of a cycle to CSV
    Csv {
        /// Output file path (default: standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Export the cycle report
    Report {
        /// Output file path (default: standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },
}

fn create_output(path: &Path) -> PeculeResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        PeculeError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> PeculeResult<()> {
    let cycles = CycleService::new(storage);

    match cmd {
        ExportCommands::Csv { output, cycle } => {
            let cycle = cycles.resolve(cycle.as_deref())?;

            match output {
                Some(path) => {
                    export_cycle_csv(storage, cycle.id, create_output(&path)?)?;
                    println!("Entries exported to: {}", path.display());
                }
                None => export_cycle_csv(storage, cycle.id, io::stdout().lock())?,
            }
        }

        ExportCommands::Report { output, cycle } => {
            let cycle = cycles.resolve(cycle.as_deref())?;
            let report = build_cycle_report(storage, cycle.id)?;
            let text = report.render_text(&settings.currency_symbol)?;

            match output {
                Some(path) => {
                    let mut writer = create_output(&path)?;
                    writer.write_all(text.as_bytes())?;
                    writer.flush()?;
                    println!(
                        "Report exported to: {} ({} page(s))",
                        path.display(),
                        report.page_count()
                    );
                }
                None => print!("{}", text),
            }
        }
    }

    Ok(())
}
