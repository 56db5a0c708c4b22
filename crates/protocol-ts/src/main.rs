//! Writes TypeScript declarations for every `vp-protocol` type.
//!
//! Usage: `vp-protocol-ts [OUT_DIR]` (defaults to `bindings/`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ts_rs::{ExportError, TS};
use vp_protocol::*;

fn export_all(out_dir: &Path) -> Result<(), ExportError> {
    // Exporting the top-level types pulls in everything they reference.
    Op::export_all_to(out_dir)?;
    Event::export_all_to(out_dir)?;
    ProjectSnapshot::export_all_to(out_dir)?;
    SnapshotSummary::export_all_to(out_dir)?;
    GlobalConfig::export_all_to(out_dir)?;
    Ok(())
}

fn main() -> ExitCode {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));

    match export_all(&out_dir) {
        Ok(()) => {
            println!("Wrote TypeScript bindings to {}", out_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to export bindings: {err}");
            ExitCode::FAILURE
        }
    }
}
