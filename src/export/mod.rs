//! Export module for Pécule
//!
//! - CSV: the entries of a cycle, spreadsheet-compatible
//! - Report: a printable summary of a cycle rendered as text

pub mod csv;
pub mod report;

pub use csv::{entries_csv_string, export_cycle_csv, write_entries_csv, CSV_HEADER};
pub use report::{build_cycle_report, CycleReport, DonutSlice, MAX_REPORT_ENTRIES};
