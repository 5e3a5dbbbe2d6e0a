//! Low-level writing logic for output routing

use super::config::OutputMode;
use std::io::{self, Write};

/// Write display output to the stream the current mode reserves for it
pub fn write_output(mode: OutputMode, args: std::fmt::Arguments) -> io::Result<()> {
    match mode {
        OutputMode::Cli => {
            print!("{args}");
            io::stdout().flush()
        }
        OutputMode::Json => {
            eprint!("{args}");
            io::stderr().flush()
        }
    }
}

/// Write display output with newline based on the current mode
pub fn writeln_output(mode: OutputMode, args: std::fmt::Arguments) -> io::Result<()> {
    match mode {
        OutputMode::Cli => {
            println!("{args}");
            io::stdout().flush()
        }
        // JSON mode keeps stdout clean for the machine-readable payload
        OutputMode::Json => {
            eprintln!("{args}");
            io::stderr().flush()
        }
    }
}

/// Write a machine-readable payload to stdout
pub fn write_json(value: &serde_json::Value) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()
}
