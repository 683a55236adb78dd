//! promptfmt - compose Markdown prompts from rich-text editor markup

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use promptfmt_core::{normalize, Config, MemoryField, Session};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Convert rich-text editor markup into Markdown
#[derive(Parser, Debug)]
#[command(name = "promptfmt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert editor markup to Markdown
    Convert {
        /// Markup file (reads stdin when omitted)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write Markdown to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Replay an editing script against a compose session
    Replay {
        /// Script file, one command per line
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Initial text of the target field
        #[arg(long, default_value = "")]
        field: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    match args.command {
        Commands::Convert { input, output } => convert(input.as_deref(), output.as_deref()),
        Commands::Replay { script, field } => replay(config, &script, field),
    }
}

fn convert(input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let markup = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read markup from stdin")?;
            buf
        }
    };

    log::debug!("converting {} bytes of markup", markup.len());
    // Both destinations get the same newline-terminated text
    let markdown = format!("{}\n", normalize(&markup));

    match output {
        Some(path) => fs::write(path, &markdown)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(markdown.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

fn replay(config: Config, script_path: &Path, field: String) -> Result<()> {
    let source = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script: {}", script_path.display()))?;
    let steps = script::parse(&source)
        .with_context(|| format!("Invalid script: {}", script_path.display()))?;

    let mut session = Session::new(config);
    session.focus(MemoryField::text_area(field));
    session.open();

    let mut stdout = io::stdout().lock();
    script::run(&mut session, &steps, &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_convert_file_output_ends_with_newline() -> Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("draft.html");
        let output = dir.path().join("draft.md");
        fs::write(&input, "<h1>Notes</h1><div><b>done</b></div>")?;

        convert(Some(&input), Some(&output))?;

        assert_eq!(fs::read_to_string(&output)?, "# Notes\n\n**done**\n");
        Ok(())
    }

    #[test]
    fn test_convert_missing_input_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.html");
        let result = convert(Some(&missing), Some(&dir.path().join("out.md")));
        assert!(result.is_err());
    }
}
