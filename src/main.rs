//! Gridcore - a minimal command-line driver for the spreadsheet engine.
//!
//! Reads `ADDRESS=text` assignments (e.g. `A1=2`, `B1==A1+3`) from stdin, one per
//! line, applies them to an in-memory sheet, and prints the final grid of values.

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use gridcore_core::Sheet;
use gridcore_engine::Position;

fn print_usage() {
    eprintln!("Usage: gridcore [OPTIONS]");
    eprintln!();
    eprintln!("Reads ADDRESS=text assignments from stdin, one per line, then prints");
    eprintln!("the resulting grid of evaluated values to stdout.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --texts   Print source text instead of evaluated values");
    eprintln!("  -h, --help    Print help");
}

fn run(print_texts: bool) -> Result<()> {
    let mut sheet = Sheet::new();
    let stdin = io::stdin();

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.with_context(|| format!("reading stdin line {}", line_no + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (addr, text) = line
            .split_once('=')
            .with_context(|| format!("line {}: expected ADDRESS=text, got {line:?}", line_no + 1))?;

        let pos = Position::parse(addr.trim())
            .with_context(|| format!("line {}: invalid cell address {addr:?}", line_no + 1))?;
        tracing::debug!(address = %addr.trim(), %text, "applying cell assignment");
        sheet
            .set_cell(pos, text)
            .with_context(|| format!("line {}: could not set {addr}", line_no + 1))?;
    }

    let mut out = io::stdout();
    if print_texts {
        sheet.print_texts(&mut out)?;
    } else {
        sheet.print_values(&mut out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut print_texts = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-t" | "--texts" => print_texts = true,
            other => {
                print_usage();
                bail!("unknown option: {other}");
            }
        }
    }

    run(print_texts)
}
