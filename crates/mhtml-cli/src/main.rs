//! `mhtml` - inspect and extract the parts of MHTML archives

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mhtml_archive::Part;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect and extract MHTML archives.
#[derive(Debug, Parser)]
#[command(name = "mhtml", version = mhtml_archive::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the archive headers and every part.
    List {
        /// Archive to read.
        file: PathBuf,
    },
    /// Write the decoded bytes of one part.
    Extract {
        /// Archive to read.
        file: PathBuf,
        /// Part number, as shown by `list` (starting at 1).
        #[arg(short, long)]
        index: usize,
        /// Destination file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a text part decoded with its detected charset.
    Text {
        /// Archive to read.
        file: PathBuf,
        /// Part number, as shown by `list` (starting at 1).
        #[arg(short, long)]
        index: usize,
    },
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for part content
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mhtml=info,mhtml_archive=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match Cli::parse().command {
        Command::List { file } => list(&file),
        Command::Extract {
            file,
            index,
            output,
        } => extract(&file, index, output.as_deref()),
        Command::Text { file, index } => text(&file, index),
    }
}

fn list(file: &Path) -> Result<()> {
    let mut archive = mhtml_archive::from_path(file)
        .with_context(|| format!("failed to open {}", file.display()))?;
    let mut out = io::stdout().lock();

    for (name, value) in archive.headers().iter() {
        writeln!(out, "{name}: {value}")?;
    }
    writeln!(out)?;

    for (index, part) in archive.parts().enumerate() {
        let part = part.with_context(|| format!("failed to read part {}", index + 1))?;
        let size = match part.decoded_bytes() {
            Ok(bytes) => bytes.len().to_string(),
            Err(e) => format!("({e})"),
        };
        writeln!(
            out,
            "{:>4}  {:<24} {:>10}  {}",
            index + 1,
            part.content_type(),
            size,
            part.content_location().unwrap_or("-")
        )?;
    }

    Ok(())
}

fn extract(file: &Path, index: usize, output: Option<&Path>) -> Result<()> {
    let part = find_part(file, index)?;
    let bytes = part
        .decoded_bytes()
        .with_context(|| format!("failed to decode part {index}"))?;

    if let Some(path) = output {
        fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        info!(bytes = bytes.len(), path = %path.display(), "wrote part {index}");
    } else {
        io::stdout().lock().write_all(bytes)?;
    }

    Ok(())
}

fn text(file: &Path, index: usize) -> Result<()> {
    let part = find_part(file, index)?;
    let text = part
        .text()
        .with_context(|| format!("failed to decode part {index} as text"))?;
    io::stdout().lock().write_all(text.as_bytes())?;
    Ok(())
}

/// Reads the archive up to part `index` (1-based).
fn find_part(file: &Path, index: usize) -> Result<Part> {
    if index == 0 {
        bail!("part numbers start at 1");
    }

    let mut archive = mhtml_archive::from_path(file)
        .with_context(|| format!("failed to open {}", file.display()))?;
    archive
        .parts()
        .nth(index - 1)
        .transpose()
        .with_context(|| format!("failed to read part {index}"))?
        .with_context(|| format!("{} has no part {index}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from(["mhtml", "extract", "page.mhtml", "-i", "3", "-o", "out.png"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Command::Extract {
                file,
                index,
                output,
            } => {
                assert_eq!(file, PathBuf::from("page.mhtml"));
                assert_eq!(index, 3);
                assert_eq!(output, Some(PathBuf::from("out.png")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_find_part_rejects_zero() {
        assert!(find_part(Path::new("page.mhtml"), 0).is_err());
    }
}
