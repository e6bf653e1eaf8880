// Interactive command loop driving a FileSystemManager.

use crate::error::Result;
use crate::fs_ops::FileSystemManager;
use crate::fs_structs::{BlockInfo, Entry, Usage};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(
    name = "blocksim",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Contiguous block allocation simulator"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a file of the given size in bytes
    #[command(visible_alias = "1")]
    Add { name: String, size: usize },
    /// Delete a file by name
    #[command(visible_aliases = ["2", "rm"])]
    Delete { name: String },
    /// Print the block table, directory and usage
    #[command(visible_aliases = ["3", "ls"])]
    Print {
        #[arg(long)]
        json: bool, // Emit one JSON document instead of tables
    },
    /// Remove every file and free all blocks
    Reset,
    /// Leave the simulator
    #[command(visible_aliases = ["4", "exit"])]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Serialize)]
struct Report {
    blocks: Vec<BlockInfo>,
    directory: Vec<Entry>,
    usage: Usage,
}

/// Parses one input line. `Ok(None)` for a blank line; clap's rendered
/// message (usage errors and help output alike) as `Err`.
pub fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.render().to_string())
}

/// Runs one command. User-facing failures are reported to `out` and the
/// session continues; contract violations are returned to the caller.
pub fn execute<W: Write>(
    fs: &mut FileSystemManager,
    command: ShellCommand,
    out: &mut W,
) -> Result<Flow> {
    let outcome = match command {
        ShellCommand::Add { name, size } => fs.add_file(&name, size).map(|entry| {
            format!(
                "File '{}' added: {} bytes in blocks {}..{}.",
                entry.name,
                entry.size,
                entry.start,
                entry.end()
            )
        }),
        ShellCommand::Delete { name } => fs
            .delete_file(&name)
            .map(|entry| format!("File '{}' deleted, {} blocks freed.", entry.name, entry.span)),
        ShellCommand::Print { json } => {
            if json {
                print_json(fs, out)?;
            } else {
                print_tables(fs, out)?;
            }
            return Ok(Flow::Continue);
        }
        ShellCommand::Reset => {
            fs.reset();
            Ok("Filesystem reset.".to_string())
        }
        ShellCommand::Quit => {
            writeln!(out, "Exiting...")?;
            return Ok(Flow::Quit);
        }
    };

    match outcome {
        Ok(message) => writeln!(out, "{}", message)?,
        Err(e) if e.is_contract_violation() => return Err(e),
        Err(e) => writeln!(out, "Error: {}", e)?,
    }
    Ok(Flow::Continue)
}

/// Reads commands from `input` until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    fs: &mut FileSystemManager,
    mut input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()> {
    let mut line = String::new();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                write!(out, "{}", message)?;
                continue;
            }
        };

        if execute(fs, command, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn print_tables<W: Write>(fs: &FileSystemManager, out: &mut W) -> Result<()> {
    writeln!(out, "Block table:")?;
    writeln!(out, "{:>8} {:>10} {:>12} {:>8}", "Block", "Used", "Fragmented", "In use")?;
    for block in fs.snapshot_table() {
        writeln!(
            out,
            "{:>8} {:>10} {:>12} {:>8}",
            block.index,
            block.used,
            block.fragmented,
            if block.occupied { "yes" } else { "no" }
        )?;
    }

    writeln!(out, "Directory table:")?;
    let entries = fs.snapshot_directory();
    if entries.is_empty() {
        writeln!(out, "(no files)")?;
    } else {
        writeln!(out, "{:<24} {:>10} {:>8} {:>8}", "Filename", "Size", "Start", "Length")?;
        for entry in entries {
            writeln!(
                out,
                "{:<24} {:>10} {:>8} {:>8}",
                entry.name, entry.size, entry.start, entry.span
            )?;
        }
    }

    let usage = fs.usage();
    writeln!(
        out,
        "{} of {} blocks free (largest contiguous run {}), {} bytes used, {} bytes fragmented, {} files.",
        usage.free_blocks,
        usage.total_blocks,
        usage.largest_free_run,
        usage.used_bytes,
        usage.fragmented_bytes,
        usage.files
    )?;
    Ok(())
}

fn print_json<W: Write>(fs: &FileSystemManager, out: &mut W) -> Result<()> {
    let report = Report {
        blocks: fs.snapshot_table(),
        directory: fs.snapshot_directory(),
        usage: fs.usage(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
